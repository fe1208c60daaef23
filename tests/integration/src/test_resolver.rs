//! Handler arbitration across the built-in and custom handlers.

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use stratosign_auth::{
        AuthError, AuthHandler, Capability, HandlerFactory, HmacAuthHandler,
        QuerySignatureV0Handler, QuerySignatureV1Handler, QuerySignatureV2Handler, Readiness,
        default_handlers, resolve_handler,
    };
    use stratosign_core::{
        CREDENTIALS_SECTION, ConfigError, ConfigSource, HttpRequest, Provider, StaticConfig,
    };

    use crate::{aws_config, full_config, init_tracing};

    /// Reports every option as present but fails to read any of them.
    struct UnreadableConfig;

    impl ConfigSource for UnreadableConfig {
        fn has(&self, _: &str, _: &str) -> bool {
            true
        }

        fn get(&self, section: &str, key: &str) -> Result<String, ConfigError> {
            Err(ConfigError::MissingOption {
                section: section.to_owned(),
                key: key.to_owned(),
            })
        }
    }

    /// Signs nothing; ready for any host.
    #[derive(Debug)]
    struct AnonymousHandler;

    impl AuthHandler for AnonymousHandler {
        fn name(&self) -> &'static str {
            "AnonymousHandler"
        }

        fn add_auth_at(&self, _: &mut HttpRequest, _: DateTime<Utc>) -> Result<(), AuthError> {
            Ok(())
        }
    }

    fn build_anonymous(
        _: &str,
        _: &dyn ConfigSource,
        _: &Provider,
    ) -> Result<Readiness, AuthError> {
        Ok(Readiness::Ready(Box::new(AnonymousHandler)))
    }

    fn anonymous_factory() -> HandlerFactory {
        HandlerFactory {
            name: "AnonymousHandler",
            capabilities: &[Capability::SignHeader],
            build: build_anonymous,
        }
    }

    fn names(handlers: &[&str]) -> Vec<String> {
        handlers.iter().map(|&n| n.to_owned()).collect()
    }

    #[test]
    fn test_should_pick_storage_handler_per_provider() {
        for (host, provider) in [
            ("bucket.s3.amazonaws.com", Provider::aws()),
            ("bucket.commondatastorage.googleapis.com", Provider::google()),
        ] {
            let handler =
                resolve_handler(host, &full_config(), &provider, &[], &default_handlers())
                    .unwrap();
            assert_eq!(handler.name(), HmacAuthHandler::NAME, "{host}");
        }
    }

    #[test]
    fn test_should_not_sign_storage_without_provider_credentials() {
        let err = resolve_handler(
            "bucket.commondatastorage.googleapis.com",
            &aws_config(),
            &Provider::google(),
            &[],
            &default_handlers(),
        )
        .unwrap_err();

        match err {
            AuthError::NoAuthHandlerFound { checked, names: checked_names } => {
                assert_eq!(checked, 4);
                assert_eq!(
                    checked_names,
                    names(&[
                        HmacAuthHandler::NAME,
                        QuerySignatureV0Handler::NAME,
                        QuerySignatureV1Handler::NAME,
                        QuerySignatureV2Handler::NAME,
                    ])
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_should_require_capability_for_query_services() {
        let err = resolve_handler(
            "ec2.amazonaws.com",
            &aws_config(),
            &Provider::aws(),
            &[],
            &default_handlers(),
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "3 AuthHandlers ready to authenticate, only 1 expected: \
             [\"QuerySignatureV0AuthHandler\", \"QuerySignatureV1AuthHandler\", \
             \"QuerySignatureV2AuthHandler\"]"
        );
    }

    #[test]
    fn test_should_report_only_capable_candidates() {
        let err = resolve_handler(
            "ec2.amazonaws.com",
            &aws_config(),
            &Provider::aws(),
            &[Capability::SignHeader],
            &default_handlers(),
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "No handler was ready to authenticate. 1 handlers were checked. [\"HmacAuthHandler\"]"
        );
    }

    #[test]
    fn test_should_reject_unsatisfiable_capabilities() {
        let err = resolve_handler(
            "ec2.amazonaws.com",
            &aws_config(),
            &Provider::aws(),
            &[Capability::SignV1, Capability::SignV2],
            &default_handlers(),
        )
        .unwrap_err();

        assert!(matches!(err, AuthError::NoAuthHandlerFound { checked: 0, .. }));
    }

    #[test]
    fn test_should_abort_on_unreadable_configuration() {
        init_tracing();
        let err = resolve_handler(
            "sdb.amazonaws.com",
            &UnreadableConfig,
            &Provider::aws(),
            &[Capability::SignV2],
            &default_handlers(),
        )
        .unwrap_err();

        match err {
            AuthError::Config(ConfigError::MissingOption { section, .. }) => {
                assert_eq!(section, CREDENTIALS_SECTION);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_should_detect_conflicting_custom_handler() {
        let mut candidates = default_handlers();
        candidates.push(anonymous_factory());

        let err = resolve_handler(
            "bucket.s3.amazonaws.com",
            &aws_config(),
            &Provider::aws(),
            &[Capability::SignHeader],
            &candidates,
        )
        .unwrap_err();

        match err {
            AuthError::TooManyAuthHandlersReady { names: ready } => {
                assert_eq!(ready, names(&[HmacAuthHandler::NAME, "AnonymousHandler"]));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_should_resolve_custom_handler_alone() {
        let handler = resolve_handler(
            "anything.example.com",
            &StaticConfig::new(),
            &Provider::aws(),
            &[Capability::SignHeader],
            &[anonymous_factory()],
        )
        .unwrap();

        let mut request = HttpRequest::builder()
            .method("GET")
            .host("anything.example.com")
            .build();
        handler.add_auth(&mut request).unwrap();

        assert_eq!(handler.name(), "AnonymousHandler");
        assert!(request.headers.is_empty());
    }
}
