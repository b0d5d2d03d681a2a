/// A file part pulled out of a multipart/form-data body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// The client-supplied `filename="..."`, possibly empty.
    pub filename: String,
    pub bytes:    Vec<u8>,
}

/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
}

/// Finds the part whose Content-Disposition carries `name="<field_name>"`
/// and a `filename` parameter, and returns its filename and raw bytes.
///
/// Returns `None` when the form has no such part.  A part that was
/// submitted without choosing a file comes back with an empty `filename`.
pub fn extract_file_field(body: &[u8], boundary: &str, field_name: &str) -> Option<UploadedFile> {
    let delimiter = format!("--{}", boundary);
    let parts = split_on(body, delimiter.as_bytes());

    for part in parts {
        let sep = b"\r\n\r\n";
        let Some(sep_pos) = find_subsequence(part, sep) else { continue };
        let headers_str = String::from_utf8_lossy(&part[..sep_pos]);
        if disposition_param(&headers_str, "name").as_deref() != Some(field_name) {
            continue;
        }
        let Some(filename) = disposition_param(&headers_str, "filename") else { continue };
        let raw = &part[sep_pos + sep.len()..];
        let bytes = raw.strip_suffix(b"\r\n").unwrap_or(raw).to_vec();
        return Some(UploadedFile { filename, bytes });
    }
    None
}

/// Looks up `key` among the parameters of the part's Content-Disposition
/// header and returns its unquoted value.
fn disposition_param(headers: &str, key: &str) -> Option<String> {
    let line = headers
        .lines()
        .find(|l| l.trim_start().to_ascii_lowercase().starts_with("content-disposition:"))?;
    split_params(line).into_iter().skip(1).find_map(|param| {
        let (k, v) = param.trim().split_once('=')?;
        k.trim().eq_ignore_ascii_case(key).then(|| v.trim().trim_matches('"').to_owned())
    })
}

/// Splits a header line on `;`, except inside double quotes.
fn split_params(line: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start  = 0;
    let mut quoted = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&line[start..]);
    params
}
