use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::types::{AllowedField, Declaration, HttpMethod};

use super::model::{
    Info, MediaType, OpenApiDocument, Operation, Parameter, PathItem, RequestBody, Response,
    Schema, JSON_MEDIA_TYPE,
};

/// Folds `(declaration, route path)` pairs into one document.
///
/// Routes sharing a path are merged into the same path item, one operation per method.
pub fn project_routes<'a, I>(info: Info, routes: I) -> OpenApiDocument
where
    I: IntoIterator<Item = (&'a Declaration, &'a str)>,
{
    routes
        .into_iter()
        .fold(OpenApiDocument::new(info), |mut doc, (decl, route_path)| {
            if let Some((key, projected)) = project_route(decl, route_path) {
                let item = doc.paths.entry(key).or_default();
                merge_path_item(item, projected);
            }
            doc
        })
}

/// Projects a single declaration. Methods other than GET, POST and PUT have no entry.
pub fn project_route(decl: &Declaration, route_path: &str) -> Option<(String, PathItem)> {
    let mut item = PathItem {
        description: decl.description.clone(),
        ..PathItem::default()
    };

    match decl.method {
        HttpMethod::Post => item.post = Some(body_operation(decl)),
        HttpMethod::Put => item.put = Some(body_operation(decl)),
        HttpMethod::Get => item.get = Some(query_operation(decl)),
        _ => return None,
    }

    Some((decl.route(route_path), item))
}

fn body_operation(decl: &Declaration) -> Operation {
    let properties = decl
        .body_fields()
        .iter()
        .filter_map(|f| Some((f.field.clone()?, field_schema(f))))
        .collect::<IndexMap<_, _>>();

    let schema = Schema {
        schema_type: Some("object".to_string()),
        properties,
        ..Schema::default()
    };

    Operation {
        request_body: Some(RequestBody {
            content: BTreeMap::from([(JSON_MEDIA_TYPE.to_string(), MediaType { schema })]),
        }),
        responses: success_response(decl),
        ..Operation::default()
    }
}

fn query_operation(decl: &Declaration) -> Operation {
    let parameters = decl
        .param_fields()
        .iter()
        .filter_map(|f| {
            Some(Parameter {
                name: f.field.clone()?,
                location: "query".to_string(),
                description: f.description.clone(),
                schema: f.field_type.as_ref().map(|t| Schema {
                    schema_type: Some(t.clone()),
                    ..Schema::default()
                }),
            })
        })
        .collect();

    Operation {
        parameters,
        responses: success_response(decl),
        ..Operation::default()
    }
}

fn field_schema(f: &AllowedField) -> Schema {
    Schema {
        schema_type: f.field_type.clone(),
        description: f.description.clone(),
        ..Schema::default()
    }
}

fn success_response(decl: &Declaration) -> BTreeMap<String, Response> {
    BTreeMap::from([(
        "200".to_string(),
        Response {
            description: decl.returns.clone().unwrap_or_default(),
        },
    )])
}

fn merge_path_item(into: &mut PathItem, from: PathItem) {
    if from.description.is_some() {
        into.description = from.description;
    }
    if from.get.is_some() {
        into.get = from.get;
    }
    if from.post.is_some() {
        into.post = from.post;
    }
    if from.put.is_some() {
        into.put = from.put;
    }
}
