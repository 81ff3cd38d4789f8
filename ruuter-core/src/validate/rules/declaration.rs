use std::collections::HashSet;

use crate::types::{AllowedField, Declaration, DECLARE_CALL};
use crate::validate::validator::Validator;

pub(crate) fn validate_declaration(v: &mut Validator, decl: &Declaration, path: &str) {
    if let Some(call) = &decl.call {
        if call != DECLARE_CALL {
            v.push(format!("{path}.call"), "must be `declare`");
        }
    }

    let namespace = decl.namespace.trim();
    if namespace.is_empty() {
        v.push(format!("{path}.namespace"), "must not be empty");
    } else if namespace.starts_with('/') || namespace.ends_with('/') {
        v.push(format!("{path}.namespace"), "must not start or end with '/'");
    }

    validate_fields(v, decl.body_fields(), &format!("{path}.allowlist.body"));
    validate_fields(v, decl.param_fields(), &format!("{path}.allowlist.params"));
}

fn validate_fields(v: &mut Validator, fields: &[AllowedField], path: &str) {
    let mut seen = HashSet::new();
    for (idx, f) in fields.iter().enumerate() {
        let fpath = format!("{path}[{idx}].field");
        match f.field.as_deref().map(str::trim) {
            None | Some("") => v.push(fpath, "must be provided"),
            Some(name) => {
                if !seen.insert(name.to_string()) {
                    v.push(fpath, "must be unique");
                }
            }
        }
    }
}
