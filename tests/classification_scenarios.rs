use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use vitrine::classifier::{ClassifierConfig, HybridClassifier};
use vitrine::embedding::{EmbeddingProvider, HashingProvider, UnavailableProvider, Vector};
use vitrine::error::{Result, VitrineError};
use vitrine::scoring::{KeywordScorer, SemanticConfig};
use vitrine::taxonomy::CategoryRegistry;

/// Every text maps to the zero vector, so every similarity is 0.
struct ZeroProvider;

#[async_trait]
impl EmbeddingProvider for ZeroProvider {
    async fn embed(&self, _text: &str) -> Result<Vector> {
        Ok(Vector::zeros(8))
    }

    fn dimension(&self) -> usize {
        8
    }

    fn name(&self) -> &str {
        "zero"
    }
}

/// Fails every call, like an unreachable embedding service.
struct BrokenProvider;

#[async_trait]
impl EmbeddingProvider for BrokenProvider {
    async fn embed(&self, _text: &str) -> Result<Vector> {
        Err(VitrineError::provider("connection refused"))
    }

    fn dimension(&self) -> usize {
        8
    }
}

/// Never answers within a reasonable timeout.
struct StalledProvider;

#[async_trait]
impl EmbeddingProvider for StalledProvider {
    async fn embed(&self, _text: &str) -> Result<Vector> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vector::zeros(8))
    }

    fn dimension(&self) -> usize {
        8
    }
}

fn two_category_registry() -> Arc<CategoryRegistry> {
    Arc::new(
        CategoryRegistry::from_json_str(
            r#"{"categories": [
                {"id": "A", "keywords": ["recette", "cuisine"], "anchors": ["cuisine"]},
                {"id": "B", "keywords": ["sport", "fitness"], "anchors": ["sport"]}
            ]}"#,
            "scenario",
        )
        .unwrap(),
    )
}

#[tokio::test]
async fn test_end_to_end_two_categories() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let classifier = HybridClassifier::new(
        two_category_registry(),
        Arc::new(ZeroProvider),
        ClassifierConfig::default(),
    )?;

    let titles = [
        "Meilleure recette de cuisine",
        "Programme de fitness intense",
        "Texte neutre sans mot-clé",
    ];
    let results = classifier.classify_batch(&titles).await;

    let primaries: Vec<&str> = results.iter().map(|r| r.primary_category.as_str()).collect();
    assert_eq!(primaries, vec!["A", "B", "A"]);
    assert!(results.iter().all(|r| r.semantic_available));
    assert_eq!(results[2].confidence, 0.0);
    Ok(())
}

#[tokio::test]
async fn test_failing_provider_falls_back_to_keywords() {
    let classifier = HybridClassifier::new(
        two_category_registry(),
        Arc::new(BrokenProvider),
        ClassifierConfig::default(),
    )
    .unwrap();

    let result = classifier.classify("Programme de fitness intense").await;
    assert_eq!(result.primary_category, "B");
    assert!(!result.semantic_available);
    assert_eq!(result.scores.len(), 2);
    for score in &result.scores {
        assert_eq!(score.semantic, 0.0);
        assert_eq!(score.combined, score.keyword);
    }

    let results = classifier
        .classify_batch(&["Meilleure recette", "", "sport"])
        .await;
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| !r.semantic_available));
}

#[tokio::test]
async fn test_provider_timeout_falls_back_to_keywords() {
    let classifier = HybridClassifier::new(
        two_category_registry(),
        Arc::new(StalledProvider),
        ClassifierConfig::default(),
    )
    .unwrap()
    .with_semantic_config(SemanticConfig {
        timeout_ms: 20,
        ..Default::default()
    });

    let results = classifier.classify_batch(&["Meilleure recette de cuisine"]).await;
    assert_eq!(results[0].primary_category, "A");
    assert!(!results[0].semantic_available);
}

#[tokio::test]
async fn test_multi_label() {
    let registry = Arc::new(
        CategoryRegistry::from_json_str(
            r#"{"categories": [
                {"id": "CUISINE", "keywords": ["recette", "cuisine"], "anchors": ["cuisine"]},
                {"id": "SPORT", "keywords": ["sport", "fitness"], "anchors": ["sport"]},
                {"id": "VOYAGE", "keywords": ["voyage", "plage"], "anchors": ["voyage"]}
            ]}"#,
            "multi",
        )
        .unwrap(),
    );
    let classifier = HybridClassifier::new(
        registry,
        Arc::new(UnavailableProvider::new()),
        ClassifierConfig::default(),
    )
    .unwrap();

    let result = classifier
        .classify("Recette de cuisine pour sportifs : fitness et sport")
        .await;
    let assigned: Vec<&str> = result.categories().collect();
    assert_eq!(assigned.len(), 2);
    assert!(assigned.contains(&"CUISINE"));
    assert!(assigned.contains(&"SPORT"));
    assert!(!assigned.contains(&"VOYAGE"));
}

#[tokio::test]
async fn test_tie_break_is_deterministic() {
    // Registry order puts Y first; the tie must still go to X.
    let registry = Arc::new(
        CategoryRegistry::from_json_str(
            r#"{"categories": [
                {"id": "Y", "keywords": [["sport", 2.0]], "anchors": ["y"]},
                {"id": "X", "keywords": [["sport", 2.0]], "anchors": ["x"]}
            ]}"#,
            "tie",
        )
        .unwrap(),
    );
    let classifier = HybridClassifier::new(
        registry,
        Arc::new(ZeroProvider),
        ClassifierConfig::default(),
    )
    .unwrap();

    for _ in 0..20 {
        let result = classifier.classify("Du sport le matin").await;
        assert_eq!(result.primary_category, "X");
        assert_eq!(result.secondary_categories, vec!["Y".to_string()]);
        assert_eq!(result.margin, 0.0);
    }
}

#[tokio::test]
async fn test_scores_cover_registry_within_bounds() {
    let registry = Arc::new(CategoryRegistry::builtin().unwrap());
    let classifier = HybridClassifier::new(
        Arc::clone(&registry),
        Arc::new(HashingProvider::new(64).unwrap()),
        ClassifierConfig::default(),
    )
    .unwrap();

    let titles = [
        "5 remèdes naturels contre le mal de dos",
        "VOICI LA RECETTE DU GÂTEAU AU CHOCOLAT !!!",
        "",
        "   ",
        "🚗⚡ 2024",
        "Retraite : ce qui change pour votre pension en 2025",
        "Il part en voyage, sa voiture tombe en panne : la banque refuse",
    ];
    let results = classifier.classify_batch(&titles).await;

    for (result, title) in results.iter().zip(titles) {
        assert_eq!(result.title, title);
        assert_eq!(result.scores.len(), registry.len());
        let ids: Vec<&str> = result.scores.iter().map(|s| s.category_id.as_str()).collect();
        assert_eq!(ids, registry.ids().collect::<Vec<_>>());
        for score in &result.scores {
            for value in [score.keyword, score.semantic, score.combined] {
                assert!((0.0..=1.0).contains(&value), "{title}: {score:?}");
            }
        }
        assert!((0.0..=1.0).contains(&result.confidence));
        assert!((0.0..=1.0).contains(&result.margin));
        assert!(!result.secondary_categories.contains(&result.primary_category));
    }
}

#[test]
fn test_keyword_score_is_pure() {
    let registry = CategoryRegistry::builtin().unwrap();
    let scorer = KeywordScorer::default();
    let title = "5 remèdes naturels contre le mal de dos";

    for category in registry.categories() {
        let first = scorer.score(title, category);
        let second = scorer.score(title, category);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    let sante = registry.lookup("SANTE_NATURELLE").unwrap();
    assert!(scorer.score(title, sante) > 0.8);
}

#[tokio::test]
async fn test_health_title_goes_to_health() {
    let classifier = HybridClassifier::new(
        Arc::new(CategoryRegistry::builtin().unwrap()),
        Arc::new(UnavailableProvider::new()),
        ClassifierConfig::default(),
    )
    .unwrap();

    let result = classifier
        .classify("5 remèdes naturels contre le mal de dos")
        .await;
    assert_eq!(result.primary_category, "SANTE_NATURELLE");
    assert!(result.primary_score().unwrap().keyword > 0.8);
}
