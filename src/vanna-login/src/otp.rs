//! Email + one-time-code exchange for an API key.

use secrecy::SecretString;
use tracing::{debug, info};

use vanna_client::{RpcTransport, params};
use vanna_common::{API_KEY_ENV_VAR, Result, VannaError};
use vanna_protocol::{ApiKey, Method, Status, UserEmail, UserOtp};

use crate::constants::PLACEHOLDER_EMAIL;
use crate::prompt::CodePrompt;
use crate::utils::safe_format_key;

/// Get an API key for `email`.
///
/// Returns `VANNA_API_KEY` when it is set, without contacting the service.
/// Otherwise mails a code to `email`, waits for `prompt` to supply it and
/// exchanges it for the key.
pub async fn get_api_key(
    transport: &RpcTransport,
    email: &str,
    prompt: &dyn CodePrompt,
) -> Result<SecretString> {
    get_api_key_with_env(transport, email, prompt, |key| std::env::var(key).ok()).await
}

/// [`get_api_key`] reading the environment through `lookup`.
pub async fn get_api_key_with_env(
    transport: &RpcTransport,
    email: &str,
    prompt: &dyn CodePrompt,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString> {
    if let Some(key) = lookup(API_KEY_ENV_VAR).filter(|k| !k.is_empty()) {
        debug!("Using API key from {API_KEY_ENV_VAR}");
        return Ok(SecretString::from(key));
    }

    check_email(email)?;
    send_code(transport, email).await?;
    let code = prompt.read_code(email).await?;
    get_api_key_with_code(transport, email, &code).await
}

/// Ask the service to mail a one-time code to `email`.
pub async fn send_code(transport: &RpcTransport, email: &str) -> Result<()> {
    check_email(email)?;
    let response = transport
        .call_unauthenticated::<Status>(
            Method::SendOtp,
            params(&UserEmail {
                email: email.to_string(),
            })?,
        )
        .await?;

    match response.result {
        Some(status) if status.success => {
            info!(email, "One-time code sent");
            Ok(())
        }
        Some(status) => Err(VannaError::Otp(format!(
            "Couldn't send the code to {email}: {}",
            status.message
        ))),
        None => Err(VannaError::Otp(response.error_message())),
    }
}

/// Exchange a code the caller already has for an API key.
pub async fn get_api_key_with_code(
    transport: &RpcTransport,
    email: &str,
    code: &str,
) -> Result<SecretString> {
    check_email(email)?;
    let code = code.trim();
    if code.is_empty() {
        return Err(VannaError::validation("Please provide the code sent to your email."));
    }

    let response = transport
        .call_unauthenticated::<ApiKey>(
            Method::VerifyOtp,
            params(&UserOtp {
                email: email.to_string(),
                otp: code.to_string(),
            })?,
        )
        .await?;

    match response.result {
        Some(ApiKey { key }) => {
            info!(email, key = %safe_format_key(&key), "Logged in");
            Ok(SecretString::from(key))
        }
        None => Err(VannaError::Otp(response.error_message())),
    }
}

fn check_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(VannaError::validation("Please provide your email address."));
    }
    if email == PLACEHOLDER_EMAIL {
        return Err(VannaError::validation(
            "Please replace my-email@example.com with your email address.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::FixedCode;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    async fn mount_otp(server: &MockServer, email: &str, code: &str, key: &str) {
        Mock::given(method("POST"))
            .and(path("/unauthenticated_rpc"))
            .and(body_json(json!({"method": "send_otp", "params": [{"email": email}]})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"result": {"success": true}})),
            )
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/unauthenticated_rpc"))
            .and(body_json(
                json!({"method": "verify_otp", "params": [{"email": email, "otp": code}]}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"key": key}})))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_full_flow() {
        let server = MockServer::start().await;
        mount_otp(&server, "user1@example.com", "DEBUG", "key-user1").await;

        let transport = RpcTransport::new(&server.uri()).unwrap();
        let key = get_api_key_with_env(
            &transport,
            "user1@example.com",
            &FixedCode("DEBUG\n".into()),
            no_env,
        )
        .await
        .unwrap();

        assert_eq!(key.expose_secret(), "key-user1");
    }

    #[tokio::test]
    async fn test_environment_key_skips_network() {
        let server = MockServer::start().await;
        let transport = RpcTransport::new(&server.uri()).unwrap();

        let key = get_api_key_with_env(&transport, "user1@example.com", &FixedCode("x".into()), |k| {
            (k == API_KEY_ENV_VAR).then(|| "env-key".to_string())
        })
        .await
        .unwrap();

        assert_eq!(key.expose_secret(), "env-key");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_placeholder_email_is_rejected() {
        let server = MockServer::start().await;
        let transport = RpcTransport::new(&server.uri()).unwrap();

        let err = get_api_key_with_env(&transport, PLACEHOLDER_EMAIL, &FixedCode("x".into()), no_env)
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_code_is_otp_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/unauthenticated_rpc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"error": {"message": "Invalid code"}})),
            )
            .mount(&server)
            .await;

        let transport = RpcTransport::new(&server.uri()).unwrap();
        let err = get_api_key_with_code(&transport, "user1@example.com", "000000")
            .await
            .unwrap_err();

        assert!(matches!(err, VannaError::Otp(_)));
        assert_eq!(err.to_string(), "OTP error: Invalid code");
    }

    #[tokio::test]
    async fn test_refused_send_is_otp_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/unauthenticated_rpc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": {"success": false, "message": "Unknown domain"}})),
            )
            .mount(&server)
            .await;

        let transport = RpcTransport::new(&server.uri()).unwrap();
        let err = send_code(&transport, "user1@example.com").await.unwrap_err();
        assert!(err.to_string().contains("Unknown domain"));
    }

    #[tokio::test]
    async fn test_blank_code_is_rejected_locally() {
        let server = MockServer::start().await;
        let transport = RpcTransport::new(&server.uri()).unwrap();
        let err = get_api_key_with_code(&transport, "user1@example.com", "  ")
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
