//! Account API handlers.
//!
//! ```text
//! POST /api/v1/auth/signup {"username":"ada","password":"hunter2"}
//! POST /api/v1/auth/login  {"username":"ada","password":"hunter2"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{CredentialsValidationError, Error, LoginCredentials, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for signup and login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsBody {
    /// Login name, 3-32 characters of letters, digits, or underscores.
    pub username: String,
    /// Plain-text password; hashed before storage, never persisted.
    pub password: String,
}

/// Response payload describing the authenticated user.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseBody {
    /// Stable user identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Login name.
    pub username: String,
}

impl From<User> for UserResponseBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
        }
    }
}

fn parse_credentials(body: CredentialsBody) -> Result<LoginCredentials, Error> {
    LoginCredentials::try_from_parts(&body.username, &body.password).map_err(|err| {
        let field = match err {
            CredentialsValidationError::Username(_) => "username",
            CredentialsValidationError::EmptyPassword => "password",
        };
        Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
    })
}

/// Create a new account and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = CredentialsBody,
    responses(
        (status = 200, description = "Account created", body = UserResponseBody),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Username already taken", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsBody>,
) -> ApiResult<web::Json<UserResponseBody>> {
    let credentials = parse_credentials(payload.into_inner())?;
    let user = state.accounts.register(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(UserResponseBody::from(user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = CredentialsBody,
    responses(
        (
            status = 200,
            description = "Login success",
            body = UserResponseBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))
        ),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Invalid credentials", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsBody>,
) -> ApiResult<web::Json<UserResponseBody>> {
    let credentials = parse_credentials(payload.into_inner())?;
    let user = state.accounts.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(UserResponseBody::from(user)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::test_utils::{in_memory_state, test_session_middleware};

    fn body(username: &str, password: &str) -> CredentialsBody {
        CredentialsBody {
            username: username.to_owned(),
            password: password.to_owned(),
        }
    }

    macro_rules! auth_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(in_memory_state()))
                    .wrap(test_session_middleware())
                    .service(signup)
                    .service(login),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn signup_then_login_succeeds() {
        let app = auth_app!();

        let signup_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/signup")
                .set_json(body("ada", "hunter2"))
                .to_request(),
        )
        .await;
        assert_eq!(signup_res.status(), StatusCode::OK);
        let created: Value = test::read_body_json(signup_res).await;
        assert_eq!(created.get("username"), Some(&Value::from("ada")));

        let login_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(body("ada", "hunter2"))
                .to_request(),
        )
        .await;
        assert_eq!(login_res.status(), StatusCode::OK);
        assert!(
            login_res
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
    }

    #[actix_web::test]
    async fn signup_rejects_duplicate_username() {
        let app = auth_app!();

        for _ in 0..2 {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/auth/signup")
                    .set_json(body("ada", "hunter2"))
                    .to_request(),
            )
            .await;
            if res.status() == StatusCode::OK {
                continue;
            }
            assert_eq!(res.status(), StatusCode::CONFLICT);
            return;
        }
        panic!("second signup should have conflicted");
    }

    #[actix_web::test]
    async fn login_rejects_bad_password() {
        let app = auth_app!();

        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/signup")
                .set_json(body("ada", "hunter2"))
                .to_request(),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(body("ada", "wrong"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn signup_validates_username_shape() {
        let app = auth_app!();

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/signup")
                .set_json(body("a b", "hunter2"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let payload: Value = test::read_body_json(res).await;
        assert_eq!(
            payload.pointer("/details/field"),
            Some(&Value::from("username"))
        );
    }
}
