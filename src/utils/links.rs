/// Drop everything from the last `?` onward.
///
/// Drive hands back links like `https://docs.google.com/spreadsheets/d/ID/edit?usp=drivesdk`;
/// the tracking query is noise in channel topics and on the puzzle page.
#[must_use]
pub fn strip_query_suffix(url: &str) -> &str {
    url.rsplit_once('?').map_or(url, |(head, _)| head)
}
