//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 액세스 토큰을 검증하고 요청 주체를 추출합니다.

use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::{
    Error, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
};

use crate::domain::entities::users::Role;
use crate::domain::models::auth::{AuthMode, RequiredRole};
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// JWT 인증 미들웨어
pub struct AuthMiddleware {
    /// 인증 모드 (Required/Optional)
    mode: AuthMode,
    /// 접근에 필요한 역할 (선택사항)
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            required_role: None,
        }
    }

    pub fn new_with_role(mode: AuthMode, required_role: RequiredRole) -> Self {
        Self {
            mode,
            required_role: Some(required_role),
        }
    }

    /// 필수 인증: 토큰이 없거나 유효하지 않으면 401
    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    /// 선택적 인증: 유효한 토큰이 있을 때만 요청 주체를 채움
    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    /// 특정 역할 요구: 인증 실패는 401, 권한 부족은 403
    pub fn required_with_role(role: Role) -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Single(role))
    }

    /// 복수 역할 중 하나 요구
    pub fn required_with_roles(roles: Vec<Role>) -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Any(roles))
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode.clone(),
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, HttpResponse, http::StatusCode, test, web};

    use super::*;
    use crate::config::JwtSettings;
    use crate::domain::dto::users::{LoginRequest, RegisterRequest};
    use crate::domain::models::auth::{AuthenticatedUser, OptionalUser};
    use crate::repositories::{MemoryTokenRepository, MemoryUserRepository};
    use crate::services::auth::{AuthService, AuthSettings};
    use crate::services::mail::MemoryMailer;

    fn auth_service() -> web::Data<AuthService> {
        web::Data::new(AuthService::new(
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryTokenRepository::new()),
            Arc::new(MemoryMailer::new()),
            AuthSettings::with_jwt(JwtSettings::with_secret("middleware-secret")),
        ))
    }

    async fn access_token(service: &AuthService) -> String {
        service
            .register(RegisterRequest {
                email: "m@example.com".into(),
                password: "secret".into(),
                name: None,
            })
            .await
            .unwrap();
        service
            .login(LoginRequest {
                email: "m@example.com".into(),
                password: "secret".into(),
            })
            .await
            .unwrap()
            .access_token
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.email)
    }

    async fn maybe(user: OptionalUser) -> HttpResponse {
        HttpResponse::Ok().body(user.0.map(|u| u.email).unwrap_or_else(|| "anonymous".into()))
    }

    #[actix_web::test]
    async fn test_required_mode() {
        let data = auth_service();
        let token = access_token(&data).await;
        let app = test::init_service(
            App::new().app_data(data.clone()).service(
                web::resource("/me")
                    .wrap(AuthMiddleware::required())
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let missing = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let garbage = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", "Bearer nope"))
            .to_request();
        assert_eq!(test::call_service(&app, garbage).await.status(), StatusCode::UNAUTHORIZED);

        let ok = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, ok).await;
        assert_eq!(body, "m@example.com");
    }

    #[actix_web::test]
    async fn test_optional_mode_allows_anonymous() {
        let data = auth_service();
        let app = test::init_service(
            App::new().app_data(data.clone()).service(
                web::resource("/maybe")
                    .wrap(AuthMiddleware::optional())
                    .route(web::get().to(maybe)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/maybe")
            .insert_header(("Authorization", "Bearer expired-or-garbage"))
            .to_request();
        assert_eq!(test::call_and_read_body(&app, req).await, "anonymous");
    }

    #[actix_web::test]
    async fn test_role_requirement_is_forbidden_for_users() {
        let data = auth_service();
        let token = access_token(&data).await;
        let app = test::init_service(
            App::new().app_data(data.clone()).service(
                web::resource("/admin")
                    .wrap(AuthMiddleware::required_with_role(Role::Admin))
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }
}
