use docquiz::infrastructure::llm::ModelFactory;
use docquiz::presentation::config::ModelSettings;

#[test]
fn given_same_model_for_both_generators_when_creating_then_instance_is_shared() {
    let registry = ModelFactory::create(&ModelSettings::default());

    assert!(registry.shares_generator());
}

#[test]
fn given_distinct_generator_models_when_creating_then_instances_are_separate() {
    let settings = ModelSettings {
        flashcard_model: "google-t5/t5-base".to_string(),
        ..ModelSettings::default()
    };

    let registry = ModelFactory::create(&settings);

    assert!(!registry.shares_generator());
}
