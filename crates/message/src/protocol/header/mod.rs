//! Header name/value validation and the header table.
//!
//! - [`validator`]: token grammar for names, injection checks for values
//! - [`HeaderValues`]: scalar-or-list admission input
//! - [`HeaderTable`]: the persistent header collection used by every message

pub mod validator;

mod values;
pub use values::HeaderValues;
pub use values::coerce_admissible;
pub use values::filter_values;

mod table;
pub use table::HeaderTable;

/// Renders a header name in Word-Case.
///
/// Each `-` separated segment gets its first letter upper-cased; the rest of
/// the segment is left as it is, so `x-FOO` becomes `X-FOO`.
pub fn word_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, segment) in name.split('-').enumerate() {
        if i > 0 {
            out.push('-');
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
