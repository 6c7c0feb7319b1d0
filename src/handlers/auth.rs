use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use crate::middleware::session::{end_session, start_session};
use crate::service::password::verify_password;
use crate::{ShowroomError, router::ShowroomState, views};

const LOGIN_FAILED: &str = "Invalid username or password.";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// GET /login
pub async fn login_form() -> Result<Html<String>, ShowroomError> {
    Ok(Html(views::login_page(None)?))
}

/// POST /login -> on success replace the session and go to the dashboard,
/// otherwise show the form again.
pub async fn login(
    State(state): State<ShowroomState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ShowroomError> {
    let (Some(username), Some(password)) = (form.username, form.password) else {
        return Ok(Html(views::login_page(Some(LOGIN_FAILED))?).into_response());
    };

    let Some(user) = state.db.find_user(&username).await? else {
        warn!(username = %username, "login attempt for unknown user");
        return Ok(Html(views::login_page(Some(LOGIN_FAILED))?).into_response());
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(username = %username, "login attempt with wrong password");
        return Ok(Html(views::login_page(Some(LOGIN_FAILED))?).into_response());
    }

    let jar = start_session(jar, &user.username, !state.insecure_cookie);
    info!(username = %user.username, "admin logged in");
    Ok((jar, Redirect::to("/dashboard")).into_response())
}

/// GET /logout
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (end_session(jar), Redirect::to("/login"))
}
