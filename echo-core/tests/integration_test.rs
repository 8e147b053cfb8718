/// Integration tests for the analysis pipeline

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use echo_core::error::{AnalysisError, Result};
    use echo_core::inference::{InferenceBackend, InferenceCall, InferenceOutput, TokenUsage};
    use echo_core::observability::MetricsCollector;
    use echo_core::presentation::status_display;
    use echo_core::response::GroundingChunk;
    use echo_core::{
        render_report, Analyzer, AnalysisRequest, AppConfig, Language, Source, Status,
        ToolSelector,
    };
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays canned outputs in order and remembers every call.
    struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<InferenceOutput>>>,
        calls: Mutex<Vec<InferenceCall>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<InferenceOutput>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<InferenceCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InferenceBackend for ScriptedBackend {
        async fn generate(&self, call: &InferenceCall) -> Result<InferenceOutput> {
            self.calls.lock().unwrap().push(call.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AnalysisError::Unknown("script exhausted".to_string())))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn config() -> AppConfig {
        AppConfig::from_toml_str(
            r#"
            [gemini]
            api_key = "test-key"
            model = "gemini-test"
            "#,
        )
        .unwrap()
    }

    const VERDICT: &str = r#"{"status":"safe","judgment":"Looks fine","confidence":87,"explanation":"...","sources":[{"title":"S1","uri":"http://s1"}]}"#;

    #[tokio::test]
    async fn test_fact_check_merges_grounding_sources() {
        let backend = ScriptedBackend::new(vec![Ok(InferenceOutput::text(VERDICT).with_grounding(
            vec![
                GroundingChunk::web(Some("Reuters"), Some("https://reuters.example/story")),
                GroundingChunk::web(Some("No link"), Some("")),
                GroundingChunk::default(),
            ],
        ))]);
        let analyzer = Analyzer::new(backend.clone(), &config());

        let result = analyzer
            .analyze(ToolSelector::FakeNews, "The moon is made of cheese", Language::En)
            .await
            .unwrap();

        assert_eq!(result.tool, ToolSelector::FakeNews);
        assert_eq!(
            result.sources,
            vec![
                Source::new("S1", "http://s1"),
                Source::new("Reuters", "https://reuters.example/story"),
            ]
        );

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "gemini-test");
        assert!(calls[0].request.use_search_grounding);
        assert!(calls[0].request.prompt.ends_with("The moon is made of cheese"));
    }

    #[tokio::test]
    async fn test_arabic_placeholder_title() {
        let backend = ScriptedBackend::new(vec![Ok(InferenceOutput::text(
            r#"{"status":"warning","judgment":"غير مؤكد","confidence":55,"explanation":"..."}"#,
        )
        .with_grounding(vec![GroundingChunk::web(None, Some("https://news.example/a"))]))]);
        let analyzer = Analyzer::new(backend, &config());

        let result = analyzer
            .analyze(ToolSelector::FakeNews, "خبر عاجل", Language::Ar)
            .await
            .unwrap();

        assert_eq!(result.sources, vec![Source::new("مصدر خارجي", "https://news.example/a")]);
    }

    #[tokio::test]
    async fn test_result_tool_matches_request_whatever_the_model_says() {
        for tool in ToolSelector::ALL {
            let backend = ScriptedBackend::new(vec![Ok(InferenceOutput::text(
                r#"{"tool":"fake_news","status":"danger","judgment":"x","confidence":99,"explanation":"y"}"#,
            ))]);
            let analyzer = Analyzer::new(backend, &config());
            let request = AnalysisRequest::new(tool, "input", Language::En);

            let result = analyzer.analyze_request(&request).await.unwrap();
            assert_eq!(result.tool, tool);
            assert_eq!(result.request_id, Some(request.id));
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_fails_the_scan() {
        let backend = ScriptedBackend::new(vec![Ok(InferenceOutput::text("{\"status\": \"safe\""))]);
        let analyzer = Analyzer::new(backend, &config());

        let err = analyzer
            .analyze(ToolSelector::Deepfake, "a photo of a celebrity", Language::En)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_transport_error_propagates_without_retry() {
        let backend = ScriptedBackend::new(vec![
            Err(AnalysisError::RateLimitExceeded("quota".to_string())),
            Ok(InferenceOutput::text(VERDICT)),
        ]);
        let analyzer = Analyzer::new(backend.clone(), &config());

        let err = analyzer
            .analyze(ToolSelector::Malware, "rm -rf /", Language::En)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::RateLimitExceeded(_)));
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_status_renders_with_warning_treatment() {
        let backend = ScriptedBackend::new(vec![Ok(InferenceOutput::text(
            r#"{"status":"unknown","judgment":"Hard to say","confidence":40,"explanation":"mixed signals"}"#,
        ))]);
        let analyzer = Analyzer::new(backend, &config());

        let result = analyzer
            .analyze(ToolSelector::Deepfake, "video link", Language::En)
            .await
            .unwrap();

        assert_eq!(result.status, Status::Other("unknown".to_string()));
        assert_eq!(status_display(&result.status), status_display(&Status::Warning));

        let report = render_report(&result, Language::En);
        assert!(report.contains("Uncertain / Verify"));
        assert!(!report.contains("Reference Sources"));
    }

    #[tokio::test]
    async fn test_null_verdict_fields_do_not_fail_the_scan() {
        let backend = ScriptedBackend::new(vec![
            Ok(InferenceOutput::text(
                r#"{"status":null,"judgment":"Unverified","confidence":30,"explanation":"...","sources":null}"#,
            )
            .with_grounding(vec![GroundingChunk::web(Some("G1"), Some("http://g1"))])),
            Ok(InferenceOutput::text(" \n")),
        ]);
        let analyzer = Analyzer::new(backend, &config());

        let result = analyzer
            .analyze(ToolSelector::FakeNews, "claim", Language::En)
            .await
            .unwrap();
        assert_eq!(status_display(&result.status), status_display(&Status::Warning));
        assert_eq!(result.sources, vec![Source::new("G1", "http://g1")]);

        let err = analyzer
            .analyze(ToolSelector::FakeNews, "claim", Language::En)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_metrics_recorded_for_success_and_failure() {
        let backend = ScriptedBackend::new(vec![
            Ok(InferenceOutput {
                usage: Some(TokenUsage {
                    input_tokens: 300,
                    output_tokens: 120,
                }),
                ..InferenceOutput::text(VERDICT)
                    .with_grounding(vec![GroundingChunk::web(Some("G"), Some("https://g.example"))])
            }),
            Ok(InferenceOutput::text("garbage")),
        ]);
        let metrics = MetricsCollector::new().unwrap();
        let analyzer = Analyzer::new(backend, &config()).with_metrics(metrics.clone());

        analyzer
            .analyze(ToolSelector::FakeNews, "claim", Language::En)
            .await
            .unwrap();
        analyzer
            .analyze(ToolSelector::FakeNews, "claim", Language::En)
            .await
            .unwrap_err();

        let stats = metrics.get_stats(ToolSelector::FakeNews);
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.failed_requests, 1);
        assert_eq!(stats.grounding_sources, 1);
        assert_eq!(metrics.active(), 0.0);

        let exported = metrics.export().unwrap();
        assert!(exported.contains("echo_tokens_input_total"));
        assert!(exported.contains("kind=\"malformed_response\""));
    }

    #[tokio::test]
    async fn test_concurrent_scans_keep_their_own_attribution() {
        let backend = ScriptedBackend::new(vec![
            Ok(InferenceOutput::text(VERDICT)),
            Ok(InferenceOutput::text(VERDICT)),
        ]);
        let analyzer = Analyzer::new(backend, &config());

        let deepfake = AnalysisRequest::new(ToolSelector::Deepfake, "clip", Language::En);
        let malware = AnalysisRequest::new(ToolSelector::Malware, "script", Language::Ar);

        let (a, b) = tokio::join!(
            analyzer.analyze_request(&deepfake),
            analyzer.analyze_request(&malware)
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!((a.tool, a.request_id), (ToolSelector::Deepfake, Some(deepfake.id)));
        assert_eq!((b.tool, b.request_id), (ToolSelector::Malware, Some(malware.id)));
    }
}
