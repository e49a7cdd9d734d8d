//! HTML entity decoding for serialized attribute payloads.
//!
//! Form markup delivers the serialized params string entity-encoded inside
//! an attribute, sometimes with stray markup embedded. [`decode`] mirrors
//! "parse as a markup fragment, read back the text content": real tags
//! vanish, character references become literal characters, and anything
//! unparsable passes through untouched.

/// Longest accepted reference body (name or numeric code) before the `;`.
/// Anything longer is treated as a literal `&`.
const MAX_REFERENCE_LEN: usize = 10;

/// Decodes an entity-encoded text blob into its human-readable form.
///
/// Tags are stripped first, then character references are resolved, so a
/// reference that *encodes* an angle bracket (`&lt;b&gt;`) survives as
/// literal text rather than being parsed as a tag. Never fails; truncated
/// or unknown references degrade to their literal spelling.
///
/// # Examples
///
/// ```
/// use formkey_pipeline::entity::decode;
///
/// assert_eq!(decode("2&amp;2"), "2&2");
/// assert_eq!(decode("%.@.[0,&quot;Hi&quot;]"), "%.@.[0,\"Hi\"]");
/// assert_eq!(decode("<b>bold</b> &lt;b&gt;"), "bold <b>");
/// assert_eq!(decode("broken &quot tail"), "broken &quot tail");
/// ```
pub fn decode(raw: &str) -> String {
    decode_references(&strip_tags(raw))
}

/// Removes `<...>` tag spans, keeping everything outside them.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn decode_references(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match parse_reference(tail) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                rest = &tail[consumed..];
            }
            None => {
                // Literal ampersand; keep scanning after it.
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parses one character reference at the start of `tail` (which begins with
/// `&`). Returns the decoded character and the byte length consumed,
/// including the terminating `;`.
fn parse_reference(tail: &str) -> Option<(char, usize)> {
    let semi = tail[1..].find(';')? + 1;
    if semi - 1 > MAX_REFERENCE_LEN || semi == 1 {
        return None;
    }
    let body = &tail[1..semi];
    let decoded = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => decode_numeric(body)?,
    };
    Some((decoded, semi + 1))
}

fn decode_numeric(body: &str) -> Option<char> {
    let digits = body.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix(['x', 'X']) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(code)
}
