//! HTTP middleware and identity extractors
//!
//! `RequireAuth` guards the mutating routes. It accepts a session token
//! from an `Authorization: Bearer` header or the `session` cookie; an
//! unauthenticated request is answered with a 302 redirect to the login
//! page carrying `?next=<original path>` instead of a 401, which is the
//! contract every guarded route shares.
//!
//! Handlers receive identity explicitly: `CurrentUser` behind
//! `RequireAuth`, `MaybeUser` on public pages that personalize when a
//! viewer is logged in.

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{error::ErrorUnauthorized, web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::security::JwtKeys;

pub const LOGIN_PATH: &str = "/auth/login/";
pub const SESSION_COOKIE: &str = "session";

/// The authenticated identity stored in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

/// Optional viewer identity for public pages.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header_token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string());

    header_token.or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))
}

fn authenticate(req: &HttpRequest) -> Option<CurrentUser> {
    let keys = req.app_data::<web::Data<JwtKeys>>()?;
    let token = bearer_token(req)?;
    let claims = keys.verify(&token).ok()?;
    let id = Uuid::parse_str(&claims.sub).ok()?;

    Some(CurrentUser {
        id,
        username: claims.username,
    })
}

/// The login redirect target for an unauthenticated request.
pub fn login_redirect(req: &HttpRequest) -> String {
    let next = match req.query_string() {
        "" => req.path().to_string(),
        query => format!("{}?{}", req.path(), query),
    };
    format!("{}?next={}", LOGIN_PATH, urlencoding::encode(&next))
}

/// Middleware guarding authenticated routes.
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAuthService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            match authenticate(req.request()) {
                Some(user) => {
                    req.extensions_mut().insert(user);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                None => {
                    let location = login_redirect(req.request());
                    tracing::debug!(path = req.path(), "unauthenticated, redirecting to login");
                    let response = HttpResponse::Found()
                        .insert_header((header::LOCATION, location))
                        .finish()
                        .map_into_right_body();
                    Ok(req.into_response(response))
                }
            }
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("authentication required")),
        )
    }
}

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<CurrentUser>()
            .cloned()
            .or_else(|| authenticate(req));
        ready(Ok(MaybeUser(user)))
    }
}
