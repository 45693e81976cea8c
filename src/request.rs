use std::time::Duration;

use reqwest::Client;

use crate::{Error, Result};

/// Builds the client shared by the listing scraper and the history source.
pub fn build_client(user_agent: &str) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .build()?;
    Ok(client)
}

/// Requests a page and returns a `Result<String>` containing the body.
/// Anything but a success status is an error.
pub(crate) async fn request_page(client: &Client, url: &str) -> Result<String> {
    let res = client.get(url).send().await?;
    let status = res.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = res.text().await?;
    Ok(body)
}
