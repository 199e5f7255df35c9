//! Alerts-only CSV export with the header `Language,URL`.

use crate::models::AlertLink;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `links` to CSV bytes.
pub fn alerts_csv(links: &[AlertLink]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut wtr = ::csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Language", "URL"])?;
    for link in links {
        wtr.write_record([link.language.as_str(), link.url.as_str()])?;
    }
    Ok(wtr.into_inner().map_err(|e| e.into_error())?)
}

#[instrument(level = "info", skip_all, fields(%path, count = links.len()))]
pub async fn write_alerts(path: &str, links: &[AlertLink]) -> Result<(), Box<dyn Error>> {
    let bytes = alerts_csv(links)?;
    fs::write(path, &bytes).await?;
    info!(bytes = bytes.len(), "Wrote alerts CSV");
    Ok(())
}
