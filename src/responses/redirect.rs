use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

/// 303 See Other, so a POST upload lands on a GET dashboard.
pub fn redirect(location: &str) -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(303)
        .header("Location", location)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)?;

    Ok(resp)
}

/// Same as `redirect` but also sets the session cookie.
pub fn redirect_with_cookie(location: &str, cookie_name: &str, token: &str) -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(303)
        .header("Location", location)
        .header(
            "Set-Cookie",
            format!("{cookie_name}={token}; Path=/; HttpOnly; SameSite=Lax"),
        )
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)?;

    Ok(resp)
}
