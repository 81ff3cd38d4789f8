//! Projection of route declarations into an OpenAPI 3 description.

mod builder;
mod model;

pub use builder::{project_route, project_routes};
pub use model::{
    Info, MediaType, OpenApiDocument, Operation, Parameter, PathItem, RequestBody, Response,
    Schema,
};
