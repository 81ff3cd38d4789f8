use ruuter_core::openapi::{project_routes, Info};
use ruuter_core::types::{AllowedField, Allowlist, Declaration, HttpMethod};

fn declaration(method: HttpMethod, namespace: &str) -> Declaration {
    Declaration {
        call: Some("declare".to_string()),
        version: None,
        description: Some(format!("{method} route")),
        method,
        accepts: None,
        returns: Some("json".to_string()),
        namespace: namespace.to_string(),
        allowlist: None,
    }
}

#[test]
fn get_and_post_routes_are_projected_with_exact_names() {
    let mut get = declaration(HttpMethod::Get, "ns");
    get.allowlist = Some(Allowlist {
        body: None,
        params: Some(vec![
            AllowedField::new("id", "string", "identifier"),
            AllowedField::new("lang", "string", "language"),
        ]),
    });
    let mut post = declaration(HttpMethod::Post, "ns");
    post.allowlist = Some(Allowlist {
        body: Some(vec![
            AllowedField::new("name", "string", "name"),
            AllowedField::new("age", "integer", "age"),
            AllowedField::new("email", "string", "email"),
        ]),
        params: None,
    });
    let delete = declaration(HttpMethod::Delete, "ns");

    let doc = project_routes(
        Info::new("ruuter", "v1.2.3"),
        [(&get, "a"), (&post, "b"), (&delete, "c")],
    );

    assert_eq!(doc.paths.len(), 2);
    assert!(!doc.paths.contains_key("/ns/c"));

    let a = doc.paths["/ns/a"].get.as_ref().unwrap();
    let names: Vec<&str> = a.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["id", "lang"]);
    assert!(a.parameters.iter().all(|p| p.location == "query"));
    assert_eq!(a.responses["200"].description, "json");

    let b = doc.paths["/ns/b"].post.as_ref().unwrap();
    let schema = &b.request_body.as_ref().unwrap().content["application/json"].schema;
    assert_eq!(schema.schema_type.as_deref(), Some("object"));
    let props: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
    assert_eq!(props, ["name", "age", "email"]);
    assert_eq!(schema.properties["age"].schema_type.as_deref(), Some("integer"));
    assert_eq!(b.responses["200"].description, "json");
}

#[test]
fn put_is_registered_as_put() {
    let mut put = declaration(HttpMethod::Put, "ns");
    put.allowlist = Some(Allowlist {
        body: Some(vec![AllowedField::new("x", "string", "x")]),
        params: None,
    });
    let doc = project_routes(Info::new("t", "v"), [(&put, "update")]);
    let item = &doc.paths["/ns/update"];
    assert!(item.put.is_some());
    assert!(item.post.is_none());
}

#[test]
fn fields_without_name_are_skipped() {
    let mut post = declaration(HttpMethod::Post, "ns");
    post.allowlist = Some(Allowlist {
        body: Some(vec![
            AllowedField {
                field: None,
                field_type: Some("string".into()),
                description: None,
            },
            AllowedField::new("kept", "string", "kept"),
        ]),
        params: None,
    });
    let doc = project_routes(Info::new("t", "v"), [(&post, "b")]);
    let op = doc.paths["/ns/b"].post.as_ref().unwrap();
    let schema = &op.request_body.as_ref().unwrap().content["application/json"].schema;
    assert_eq!(schema.properties.len(), 1);
    assert!(schema.properties.contains_key("kept"));
}

#[test]
fn routes_sharing_a_path_are_merged() {
    let get = declaration(HttpMethod::Get, "ns");
    let post = declaration(HttpMethod::Post, "ns");
    let doc = project_routes(Info::new("t", "v"), [(&get, "same"), (&post, "same")]);
    let item = &doc.paths["/ns/same"];
    assert!(item.get.is_some());
    assert!(item.post.is_some());
}

#[test]
fn serialized_document_uses_openapi_field_names() {
    let get = declaration(HttpMethod::Get, "ns");
    let doc = project_routes(Info::new("ruuter", "v0.0.1"), [(&get, "a")]);
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["openapi"], "3.0.1");
    assert_eq!(json["info"]["title"], "ruuter");
    assert_eq!(json["paths"]["/ns/a"]["description"], "GET route");
    assert!(json["paths"]["/ns/a"]["get"]["responses"]["200"].is_object());
}

#[test]
fn body_properties_keep_declaration_order() {
    let mut post = declaration(HttpMethod::Post, "ns");
    post.allowlist = Some(Allowlist {
        body: Some(vec![
            AllowedField::new("zeta", "string", "last letter"),
            AllowedField::new("alpha", "string", "first letter"),
        ]),
        params: None,
    });
    let doc = project_routes(Info::new("t", "v"), [(&post, "b")]);
    let json = serde_json::to_value(&doc).unwrap();
    let props = &json["paths"]["/ns/b"]["post"]["requestBody"]["content"]["application/json"]
        ["schema"]["properties"];
    let keys: Vec<&str> = props.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["zeta", "alpha"]);
}
