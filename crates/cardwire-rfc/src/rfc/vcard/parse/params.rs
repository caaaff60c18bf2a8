//! Typed parameter projection.

use cardwire_core::config::BareParamPolicy;

use crate::rfc::vcard::core::{
    ContentLocation, Encoding, KNOWN_CHARSETS, Level, Parameters, PropertyId, VCardParameter,
    ValueType,
};

/// Builds the typed view of a row's parameters.
///
/// Recognised keys are matched case-insensitively. Values that fail to
/// parse (a `PREF` outside 1..=100, a non-numeric `INDEX`, an unknown
/// `ENCODING`) are dropped; unknown keys are kept in `extra` as written.
#[must_use]
pub fn typed_parameters(raw: &[VCardParameter], policy: BareParamPolicy) -> Parameters {
    let mut params = Parameters::new();

    for param in raw {
        if param.is_bare() {
            apply_bare(&mut params, param, policy);
        } else {
            apply(&mut params, param);
        }
    }

    params
}

fn apply(params: &mut Parameters, param: &VCardParameter) {
    let first = param.value().unwrap_or_default().trim();
    let joined = || param.values.join(",");

    match param.name.to_ascii_uppercase().as_str() {
        "LANGUAGE" => params.language = Some(joined()),
        "VALUE" => {
            if let Some(value_type) = ValueType::parse(first) {
                params.value = Some(value_type);
            } else if let Some(location) = ContentLocation::parse(first) {
                params.content_location = Some(location);
            } else {
                params.add_extra(param.clone());
            }
        }
        "PREF" => {
            if let Some(pref) = first.parse::<u8>().ok().filter(|p| (1..=100).contains(p)) {
                params.pref = Some(pref);
            }
        }
        "PID" => params
            .pids
            .extend(param.values.iter().filter_map(|v| PropertyId::parse(v))),
        "TYPE" => {
            for value in param.values.iter().map(|v| v.trim()) {
                if !value.is_empty() {
                    params.add_type(value);
                }
            }
        }
        "GEO" => params.geo = Some(joined()),
        "TZ" => params.tz = Some(joined()),
        "SORT-AS" => params.sort_as.extend(param.values.iter().cloned()),
        "CALSCALE" => params.calscale = Some(joined()),
        "ENCODING" => {
            if let Some(encoding) = Encoding::parse(first) {
                params.encoding = Some(encoding);
            }
        }
        "CHARSET" => params.charset = Some(first.to_string()),
        "ALTID" => params.alt_id = Some(joined()),
        "MEDIATYPE" => params.media_type = Some(joined()),
        "LABEL" => params.label = Some(joined()),
        "CONTEXT" => params.context = Some(joined()),
        "CC" => params.cc = Some(first.to_string()),
        "INDEX" => {
            if let Some(index) = first.parse::<u32>().ok().filter(|i| *i > 0) {
                params.index = Some(index);
            }
        }
        "LEVEL" => {
            if let Some(level) = Level::parse(first) {
                params.level = Some(level);
            }
        }
        _ => params.add_extra(param.clone()),
    }
}

/// Infers the key of a bare 2.1 token.
fn apply_bare(params: &mut Parameters, param: &VCardParameter, policy: BareParamPolicy) {
    let token = param.name.trim();

    if let Some(encoding) = Encoding::parse(token).filter(|e| *e != Encoding::B) {
        params.encoding = Some(encoding);
    } else if KNOWN_CHARSETS.iter().any(|c| c.eq_ignore_ascii_case(token)) {
        params.charset = Some(token.to_string());
    } else if let Some(location) = ContentLocation::parse(token) {
        params.content_location = Some(location);
    } else {
        match policy {
            BareParamPolicy::Residual => params.add_extra(param.clone()),
            BareParamPolicy::Type => params.add_type(token),
        }
    }
}
