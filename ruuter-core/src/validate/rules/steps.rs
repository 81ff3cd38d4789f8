use std::collections::HashSet;

use crate::expressions::validate_value_expressions;
use crate::types::{AnyValue, StepDef, DECLARE_CALL, END_STEP};
use crate::validate::validator::{Validator, ID_RE};

pub(crate) fn validate_steps(v: &mut Validator, steps: &[StepDef]) {
    if steps.is_empty() {
        v.push("$", "pipeline must have at least one step");
    }

    let mut names = HashSet::<&str>::new();
    for step in steps {
        let path = format!("$.{}", step.name);
        if !ID_RE.is_match(&step.name) {
            v.push(&path, "step name must match regex [A-Za-z0-9_\\-]+");
        }
        if step.name == END_STEP {
            v.push(&path, "`end` is reserved and cannot name a step");
        }
        if !names.insert(step.name.as_str()) {
            v.push(&path, "step name must be unique");
        }

        match step.kind.as_deref() {
            None | Some("") => v.push(
                &path,
                "cannot determine step kind \
                 (expected `call`, `assign`, `switch`, `return` or `script`)",
            ),
            Some(DECLARE_CALL) => v.push(&path, "only one declaration is allowed per pipeline"),
            Some(_) => {}
        }

        if let Err(e) = validate_value_expressions(&evaluated_parameters(step)) {
            v.push(&path, format!("invalid expression: {e}"));
        }
    }

    for step in steps {
        let Some(next) = &step.next else { continue };
        if next != END_STEP && !names.contains(next.as_str()) {
            v.push(
                format!("$.{}.next", step.name),
                format!("must reference an existing step or `end` (got `{next}`)"),
            );
        }
    }

    validate_switch_targets(v, steps, &names);
}

/// Parameters the step kinds evaluate as templates. `script.source` is handed to the
/// script runtime verbatim, so its `${...}` segments are not context paths.
fn evaluated_parameters(step: &StepDef) -> AnyValue {
    let mut params = step.parameters.clone();
    if step.kind() == "script" {
        if let Some(AnyValue::Object(script)) = params.get_mut("script") {
            script.remove("source");
        }
    }
    AnyValue::Object(params)
}

fn validate_switch_targets(v: &mut Validator, steps: &[StepDef], names: &HashSet<&str>) {
    for step in steps.iter().filter(|s| s.kind() == "switch") {
        let Some(cases) = step.param("switch").and_then(AnyValue::as_array) else {
            v.push(format!("$.{}.switch", step.name), "must be a list of cases");
            continue;
        };
        for (idx, case) in cases.iter().enumerate() {
            let cpath = format!("$.{}.switch[{idx}]", step.name);
            if case.get("condition").is_none() {
                v.push(format!("{cpath}.condition"), "must be provided");
            }
            match case.get("next").and_then(AnyValue::as_str) {
                None => v.push(format!("{cpath}.next"), "must be provided"),
                Some(target) if target != END_STEP && !names.contains(target) => v.push(
                    format!("{cpath}.next"),
                    format!("must reference an existing step or `end` (got `{target}`)"),
                ),
                Some(_) => {}
            }
        }
    }
}
