//! Key/value extraction from form bodies and query strings.

/// One `key=value` pair taken from a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedParam<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Split `input` on `&`, then each piece on its first `=`.
///
/// Values are left exactly as received; unquoting is the decode chain's job.
/// A piece with no `=` yields an empty value, and an empty input still yields
/// one empty parameter.
pub fn parse_params(input: &str) -> impl Iterator<Item = CapturedParam<'_>> {
    input.split('&').map(|param| match param.split_once('=') {
        Some((key, value)) => CapturedParam { key, value },
        None => CapturedParam {
            key: param,
            value: "",
        },
    })
}

/// Query string of a request target, if it has one.
pub fn query_of(target: &str) -> Option<&str> {
    target.split_once('?').map(|(_, query)| query)
}
