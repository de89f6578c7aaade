//! Search page submissions from configuration through to browser history.

use std::sync::Arc;

use search_shell::config::loader::parse_config;
use search_shell::config::ConfigFeatureFlags;
use search_shell::history::{History, HistoryAction};
use search_shell::search::navigation;
use search_shell::search::{
    InMemoryQueryStore, InputEnvironment, InputWidget, PatternType, QueryStateStore,
    SearchInputController, SearchInputOptions, StaticEnvironment, SubmissionSource,
    SubmitOverrides,
};

const CONFIG: &str = r#"
[site]
sourcegraph_url = "https://sourcegraph.example.com"
structural_search = "disabled"
external_services_user_mode = "all"

[experimental_features]
apply_search_query_suggestion_on_enter = false

[search]
pattern_type = "regexp"
case_sensitive = true
"#;

#[tokio::test]
async fn test_submission_reaches_history() {
    let config = parse_config(CONFIG).unwrap();
    let flags = ConfigFeatureFlags::new(config.experimental_features.clone());
    let store = Arc::new(InMemoryQueryStore::from_defaults(&config.search));
    let (dispatcher, receiver) = navigation::channel();

    let history = Arc::new(History::new());
    let sink = history.clone();
    let consumer = tokio::spawn(async move { receiver.run(sink.as_ref()).await });

    let mut controller = SearchInputController::new(SearchInputOptions {
        store: store.clone(),
        dispatcher,
        environment: InputEnvironment::evaluate(
            &StaticEnvironment::desktop(config.site.clone()),
            &flags,
        ),
        source: SubmissionSource::Home,
        search_contexts_enabled: true,
        selected_search_context_spec: Some("global".to_string()),
        auto_focus: true,
    });

    match controller.input_widget() {
        InputWidget::SearchBox(props) => {
            assert!(props.structural_search_disabled);
            assert!(props.is_external_services_user_mode_all);
            assert!(!props.apply_suggestions_on_enter);
            assert_eq!(props.pattern_type, PatternType::Regexp);
            assert!(props.case_sensitive);
        }
        other => panic!("unexpected widget: {:?}", other),
    }

    controller.set_query("  ");
    controller.on_submit();

    controller.set_query("func main");
    store.set_case_sensitivity(false);
    controller.on_submit();

    drop(controller);
    consumer.await.unwrap();

    let entries = history.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, HistoryAction::Push);
    assert_eq!(
        entries[0].url,
        "/search?q=context%3Aglobal+func+main&patternType=regexp&sm=0"
    );
}

#[tokio::test]
async fn test_filter_submission_overrides_pattern_type() {
    let config = parse_config(CONFIG).unwrap();
    let flags = ConfigFeatureFlags::new(config.experimental_features.clone());
    let (dispatcher, mut receiver) = navigation::channel();

    let mut controller = SearchInputController::new(SearchInputOptions {
        store: Arc::new(InMemoryQueryStore::from_defaults(&config.search)),
        dispatcher,
        environment: InputEnvironment::evaluate(
            &StaticEnvironment::touch(config.site.clone()),
            &flags,
        ),
        source: SubmissionSource::Home,
        search_contexts_enabled: false,
        selected_search_context_spec: None,
        auto_focus: true,
    });
    controller.set_query("lang:rust");
    controller.submit(
        SubmitOverrides::default()
            .pattern_type(PatternType::Literal)
            .source(SubmissionSource::Filter),
    );

    let params = receiver.next().await.unwrap();
    assert_eq!(params.pattern_type(), PatternType::Literal);
    assert_eq!(params.source(), SubmissionSource::Filter);
    assert!(params.case_sensitive());

    assert!(matches!(
        controller.input_widget(),
        InputWidget::SearchBox(ref props) if !props.auto_focus && !props.show_search_context
    ));
}
