//! Forms can only `POST`; `?_method=PUT` (or `PATCH`, `DELETE`) on a `POST`
//! turns it into that verb before the router picks a handler.

use axum::{
    extract::{Query, Request},
    http::{Method, Uri},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct OverrideQuery {
    #[serde(rename = "_method")]
    method: Option<String>,
}

pub async fn method_override(mut request: Request, next: Next) -> Response {
    if request.method() == Method::POST {
        if let Some(method) = overridden(request.uri()) {
            *request.method_mut() = method;
        }
    }
    next.run(request).await
}

fn overridden(uri: &Uri) -> Option<Method> {
    let Query(OverrideQuery { method }) = Query::try_from_uri(uri).ok()?;
    match method?.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("/c?_method=PUT", Some(Method::PUT))]
    #[case("/c?_method=delete", Some(Method::DELETE))]
    #[case("/c?a=1&_method=PATCH", Some(Method::PATCH))]
    #[case("/c?_method=%44ELETE", Some(Method::DELETE))]
    #[case("/c?_m%65thod=PUT", Some(Method::PUT))]
    #[case("/c?_method=GET", None)]
    #[case("/c?_method", None)]
    #[case("/c?method=PUT", None)]
    #[case("/c", None)]
    fn override_values(#[case] uri: &'static str, #[case] expected: Option<Method>) {
        assert_eq!(overridden(&Uri::from_static(uri)), expected);
    }
}
