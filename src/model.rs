//! Records shared by the listing shards and the unified output.

use serde::{Deserialize, Serialize};

/// A club reference. `club_id` is `0` when the source row carried no club link
/// (free agents, "Without Club", retired players and similar pseudo clubs).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub club_id: u32,
    pub club_name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
}

/// Normalized transfer fee in euros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    #[serde(rename = "fee_eur")]
    pub amount: f64,
    pub is_loan: bool,
}

impl Fee {
    pub const FREE: Fee = Fee {
        amount: 0.0,
        is_loan: false,
    };

    pub fn new(amount: f64, is_loan: bool) -> Self {
        Self { amount, is_loan }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: Club,
    pub to: Club,
    #[serde(flatten)]
    pub fee: Fee,
    /// `"YYYY/YYYY+1"` as reported by the source.
    pub season: String,
}

/// One row of a season listing, as persisted in a shard file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSighting {
    pub player_id: u32,
    pub player_name: String,
    pub player_url: String,
    pub nationality: String,
    pub transfer: Transfer,
}

/// A player with the complete transfer history taken from the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: u32,
    pub player_name: String,
    pub player_url: String,
    pub nationality: String,
    pub transfers: Vec<Transfer>,
}

/// Format a season label the way the listing pages use it.
pub fn season_label(year: i32) -> String {
    format!("{}/{}", year, year + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_serializes_flat_fee_fields() {
        let transfer = Transfer {
            from: Club {
                club_id: 210,
                club_name: "Flamengo".into(),
                country: "Brazil".into(),
                continent: None,
            },
            to: Club::default(),
            fee: Fee::new(1_500_000.0, true),
            season: season_label(2022),
        };

        let value = serde_json::to_value(&transfer).unwrap();
        assert_eq!(value["fee_eur"], 1_500_000.0);
        assert_eq!(value["is_loan"], true);
        assert_eq!(value["season"], "2022/2023");
        assert!(value["from"].get("continent").is_none());
    }

    #[test]
    fn sighting_reads_shard_row_without_continent() {
        let raw = r#"{
            "player_id": 7,
            "player_name": "Some Player",
            "player_url": "https://www.transfermarkt.com/x/profil/spieler/7",
            "nationality": "Brazil",
            "transfer": {
                "from": {"club_id": 0, "club_name": "Without Club", "country": ""},
                "to": {"club_id": 5, "club_name": "Santos", "country": "Brazil"},
                "fee_eur": 0,
                "is_loan": false,
                "season": "2021/2022"
            }
        }"#;

        let sighting: PlayerSighting = serde_json::from_str(raw).unwrap();
        assert_eq!(sighting.player_id, 7);
        assert_eq!(sighting.transfer.fee, Fee::FREE);
        assert_eq!(sighting.transfer.to.continent, None);
    }
}
