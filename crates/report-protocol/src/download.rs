use std::borrow::Cow;

pub const DOWNLOAD_REPORT_PATH: &str = "/download_report";
pub const FILE_PATH_PARAM: &str = "file_path";

/// Path and query fetching a generated artifact from the report service.
pub fn download_path(file_path: &str) -> String {
    format!(
        "{DOWNLOAD_REPORT_PATH}?{FILE_PATH_PARAM}={}",
        urlencoding::encode(file_path)
    )
}

/// Recovers the artifact locator from a link built by [`download_path`].
pub fn file_path_from_query(url: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != FILE_PATH_PARAM {
            return None;
        }
        urlencoding::decode(value).ok().map(Cow::into_owned)
    })
}
