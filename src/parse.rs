use scraper::{ElementRef, Html, Selector};
use tokio::task::spawn_blocking;

use crate::{Error, Result};

/// A listing row needs at least this many (nested) cells to carry a transfer.
const MIN_ROW_CELLS: usize = 17;

const PLAYER_CELL: usize = 1;
const FROM_CLUB_CELL: usize = 10;
const FROM_FLAG_CELL: usize = 11;
const TO_CLUB_CELL: usize = 14;
const TO_FLAG_CELL: usize = 15;
const FEE_CELL: usize = 16;

/// Raw strings extracted from one transfer row of a season listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingRow {
    pub player_href: String,
    pub player_name: String,
    pub from: ClubCell,
    pub to: ClubCell,
    pub fee_text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClubCell {
    pub name: String,
    pub href: String,
    pub flag_title: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    /// Rank shown in the first row; a page repeating the previous rank is the last one.
    pub first_rank: Option<u64>,
    pub rows: Vec<ListingRow>,
}

impl ListingRow {
    /// Player id is the last segment of the profile link.
    pub fn player_id(&self) -> Option<u32> {
        self.player_href
            .rsplit('/')
            .next()
            .and_then(|id| id.parse().ok())
            .filter(|id| *id != 0)
    }
}

struct Selectors {
    row: Selector,
    cell: Selector,
    player_row: Selector,
    link: Selector,
    flag: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            row: create_selector("table.items tbody tr")?,
            cell: create_selector("td")?,
            player_row: create_selector("table.inline-table tbody tr")?,
            link: create_selector("td.hauptlink a")?,
            flag: create_selector("td img.flaggenrahmen")?,
        })
    }
}

/// Parses a listing page off the async runtime.
pub(crate) async fn parse_listing(html: String) -> Result<ListingPage> {
    spawn_blocking(move || parse_listing_html(&html)).await?
}

/// Extracts the transfer rows of a season listing page.
pub fn parse_listing_html(html: &str) -> Result<ListingPage> {
    let doc = Html::parse_document(html);
    let sel = Selectors::new()?;

    let mut page = ListingPage::default();
    for (idx, row) in doc.select(&sel.row).enumerate() {
        let cells: Vec<ElementRef> = row.select(&sel.cell).collect();
        if cells.len() < MIN_ROW_CELLS {
            continue;
        }

        if idx == 0 {
            page.first_rank = text_of(&cells[0]).parse().ok();
        }

        let Some(player_link) = cells[PLAYER_CELL]
            .select(&sel.player_row)
            .next()
            .and_then(|tr| tr.select(&sel.link).next())
        else {
            continue;
        };

        page.rows.push(ListingRow {
            player_href: player_link.value().attr("href").unwrap_or_default().to_string(),
            player_name: text_of(&player_link),
            from: club_cell(&sel, &cells[FROM_CLUB_CELL], &cells[FROM_FLAG_CELL]),
            to: club_cell(&sel, &cells[TO_CLUB_CELL], &cells[TO_FLAG_CELL]),
            fee_text: text_of(&cells[FEE_CELL]),
        });
    }
    Ok(page)
}

fn club_cell(sel: &Selectors, club: &ElementRef, flag: &ElementRef) -> ClubCell {
    let mut cell = ClubCell::default();
    // Last link wins.
    for link in club.select(&sel.link) {
        cell.href = link.value().attr("href").unwrap_or_default().to_string();
        cell.name = text_of(&link);
    }
    for img in flag.select(&sel.flag) {
        if let Some(title) = img.value().attr("title") {
            cell.flag_title = title.to_string();
        }
    }
    cell
}

#[inline]
fn text_of(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a listing row shaped like the season statistics table. Indices below
    /// are positions in the flattened list of descendant cells.
    pub(crate) fn listing_row(
        rank: u32,
        player: (&str, u32),
        from: &str,
        to: &str,
        fee: &str,
    ) -> String {
        let (name, id) = player;
        let club = |club: &str| {
            if club.is_empty() {
                r#"<td class="hauptlink">Without Club</td>"#.to_string()
            } else {
                format!(
                    r#"<td class="hauptlink"><a href="/{club}/startseite/verein/{len}">{club}</a></td>"#,
                    len = club.len()
                )
            }
        };
        let flag = |title: &str| {
            format!(r#"<td><img class="flaggenrahmen" title="{title}" src="x.png"></td>"#)
        };

        // 0: rank, 1: player block (2 and 3 nested inside it), 4..=9: age, nationality,
        // market value and league columns.
        let mut cells = vec![
            format!("<td>{rank}</td>"),
            format!(
                r#"<td><table class="inline-table"><tbody><tr><td class="hauptlink"><a href="/{name}/profil/spieler/{id}">{name}</a></td></tr><tr><td>Centre-Forward</td></tr></tbody></table></td>"#
            ),
        ];
        cells.extend((4..=9).map(|_| "<td></td>".to_string()));
        cells.push(club(from));
        cells.push(flag("Brazil"));
        cells.push("<td>Serie A</td>".into());
        cells.push("<td></td>".into());
        cells.push(club(to));
        cells.push(flag("Germany"));
        cells.push(format!("<td>{fee}</td>"));

        format!("<tr>{}</tr>", cells.join(""))
    }

    pub(crate) fn listing_page(rows: &[String]) -> String {
        format!(
            r#"<html><body><div class="responsive-table"><table class="items"><thead><tr><th>#</th></tr></thead>
               <tbody>{}</tbody></table></div></body></html>"#,
            rows.join("")
        )
    }

    #[test]
    fn empty_page_has_no_rows() {
        let page = parse_listing_html(&listing_page(&[])).unwrap();
        assert_eq!(page, ListingPage::default());
    }

    #[test]
    fn extracts_row_fields() {
        let html = listing_page(&[
            listing_row(1, ("neymar", 68290), "santos", "barcelona", "€88.20m"),
            listing_row(2, ("nobody", 12), "", "fluminense", "free transfer"),
        ]);

        let page = parse_listing_html(&html).unwrap();

        assert_eq!(page.first_rank, Some(1));
        assert_eq!(page.rows.len(), 2);

        let row = &page.rows[0];
        assert_eq!(row.player_id(), Some(68290));
        assert_eq!(row.player_name, "neymar");
        assert_eq!(row.from.href, "/santos/startseite/verein/6");
        assert_eq!(row.from.name, "santos");
        assert_eq!(row.from.flag_title, "Brazil");
        assert_eq!(row.to.name, "barcelona");
        assert_eq!(row.to.flag_title, "Germany");
        assert_eq!(row.fee_text, "€88.20m");

        let linkless = &page.rows[1].from;
        assert_eq!(linkless.href, "");
        assert_eq!(linkless.name, "");
    }

    #[test]
    fn short_rows_are_ignored() {
        let html = listing_page(&["<tr><td>1</td><td>no transfer here</td></tr>".to_string()]);
        let page = parse_listing_html(&html).unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.first_rank, None);
    }

    #[test]
    fn player_id_comes_from_last_segment() {
        let row = ListingRow {
            player_href: "/neymar/profil/spieler/68290".into(),
            ..Default::default()
        };
        assert_eq!(row.player_id(), Some(68290));

        let row = ListingRow {
            player_href: "/neymar/profil/spieler/".into(),
            ..Default::default()
        };
        assert_eq!(row.player_id(), None);
    }
}
