// Property tests for similarity and retrieval invariants
use casebase_core::{AttributeValue, Case, CaseBase};
use casebase_similarity::{
    numeric_similarity, set_similarity, CaseEngine, EuclideanDistance, Retriever, WeightMap,
};
use proptest::prelude::*;
use std::sync::Arc;

const GENRES: [&str; 6] = ["Action", "Comedy", "Crime", "Drama", "Horror", "Sci-Fi"];

fn genre_set() -> impl Strategy<Value = Vec<String>> {
    proptest::sample::subsequence(GENRES.to_vec(), 0..=GENRES.len())
        .prop_map(|genres| genres.into_iter().map(str::to_string).collect::<Vec<String>>())
}

fn case_strategy() -> impl Strategy<Value = (f64, f64, Vec<String>, usize)> {
    (1.0f64..10.0, 60.0f64..240.0, genre_set(), 0usize..4)
}

fn case_base(rows: Vec<(f64, f64, Vec<String>, usize)>) -> CaseBase {
    let titles = ["Heat", "Ronin", "Thief", "Up"];
    let cases = rows
        .into_iter()
        .enumerate()
        .map(|(i, (rating, runtime, genres, title))| {
            Case::new(i as u64)
                .with_display_key(titles[title])
                .with_attribute("IMDB_Rating", rating)
                .with_attribute("Runtime", runtime)
                .with_attribute("Genre", AttributeValue::MultiValued(genres))
                .with_features(vec![rating, runtime / 10.0])
        })
        .collect();
    CaseBase::build(cases).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_jaccard_symmetric(a in genre_set(), b in genre_set()) {
        let ab = set_similarity(&a, &b);
        let ba = set_similarity(&b, &a);
        prop_assert!((ab - ba).abs() < 1e-12);
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    #[test]
    fn prop_jaccard_identical_is_one(a in genre_set()) {
        prop_assert_eq!(set_similarity(&a, &a), 1.0);
    }

    #[test]
    fn prop_constant_column_always_one(value in -1e6f64..1e6, a in -1e6f64..1e6, b in -1e6f64..1e6) {
        prop_assert_eq!(numeric_similarity(Some(a), Some(b), (value, value)), 1.0);
    }

    #[test]
    fn prop_numeric_similarity_in_unit_range(a in 0.0f64..100.0, b in 0.0f64..100.0) {
        let s = numeric_similarity(Some(a), Some(b), (0.0, 100.0));
        prop_assert!((0.0..=1.0).contains(&s));
        prop_assert!((s - numeric_similarity(Some(b), Some(a), (0.0, 100.0))).abs() < 1e-12);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_identical_case_scores_one(rows in prop::collection::vec(case_strategy(), 2..12), pick in 0usize..12) {
        let base = case_base(rows);
        let engine = CaseEngine::new(Arc::new(base), WeightMap::new());
        let case = engine.base().get(pick % engine.base().len()).unwrap();

        prop_assert!((engine.similarity(case, case, None) - 1.0).abs() < 1e-9);

        let distance = case.features.as_ref().unwrap().euclidean_distance(case.features.as_ref().unwrap()).unwrap();
        prop_assert_eq!(distance, 0.0);
    }

    #[test]
    fn prop_retrieval_sorted_and_leave_one_out(
        rows in prop::collection::vec(case_strategy(), 2..16),
        k in 1usize..20,
    ) {
        let base = Arc::new(case_base(rows));
        let engine = CaseEngine::new(Arc::clone(&base), WeightMap::new());
        let vectors = Retriever::new(&base, EuclideanDistance);

        for query in base.iter() {
            let neighbors = engine.retrieve_neighbors(query, k, None).unwrap();
            prop_assert_eq!(neighbors.len(), k.min(base.len() - 1));
            prop_assert!(neighbors.windows(2).all(|w| w[0].score >= w[1].score));
            prop_assert!(neighbors.iter().all(|n| n.case.id != query.id));

            let nearest = vectors.retrieve(query, k).unwrap();
            prop_assert!(nearest.windows(2).all(|w| w[0].score <= w[1].score));
            prop_assert!(nearest.iter().all(|n| n.case.id != query.id));
        }
    }

    #[test]
    fn prop_recommend_unique_and_excludes_own_title(
        rows in prop::collection::vec(case_strategy(), 2..16),
        top_k in 1usize..6,
    ) {
        let base = case_base(rows);
        let engine = CaseEngine::new(Arc::new(base), WeightMap::new());

        for target in engine.base().iter() {
            let results = engine.recommend_similar(target, top_k).unwrap();
            prop_assert!(results.len() <= top_k);

            let own = target.normalized_display_key();
            let mut keys: Vec<Option<String>> = results.iter().map(|n| n.case.normalized_display_key()).collect();
            prop_assert!(keys.iter().all(|key| *key != own));
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), results.len());
        }
    }
}
