/*!
HTTP download for the demonstration drivers.

Transport failure is not interesting to the drivers: they log it and carry on
with an empty body, so everything downstream still runs.
*/

use tracing::error;

/**
Download `url` into a byte buffer.

Returns the response body, or an empty buffer on any transport or status
failure. The failure is logged to stderr rather than propagated.
*/
pub fn fetch(url: &str) -> Vec<u8> {
    let body = reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes());

    match body {
        Ok(body) => body.to_vec(),
        Err(err) => {
            error!(%err, url, "fetch failed");
            Vec::new()
        }
    }
}
