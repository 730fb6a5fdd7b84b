//! Typed load/save of scenarios over the snapshot repository.

use playbook_core::clock::Clock;
use playbook_core::error::DomainError;
use playbook_core::repository::{SnapshotRepository, StoredSnapshot};
use uuid::Uuid;

use crate::domain::scenarios::Scenario;

/// Entity type discriminator for scenario snapshots.
pub const SCENARIO_ENTITY_TYPE: &str = "SCENARIO";

/// Loads a scenario by id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no scenario exists for the id, or
/// `DomainError::Infrastructure` if the snapshot fails to deserialize.
pub async fn load_scenario(
    repo: &dyn SnapshotRepository,
    scenario_id: Uuid,
) -> Result<Scenario, DomainError> {
    let snapshot = repo.load(scenario_id).await?;
    serde_json::from_value(snapshot.payload).map_err(|e| {
        DomainError::Infrastructure(format!("scenario deserialization failed: {e}"))
    })
}

/// Loads every stored scenario.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if listing or deserialization
/// fails.
pub async fn list_scenarios(
    repo: &dyn SnapshotRepository,
) -> Result<Vec<Scenario>, DomainError> {
    let snapshots = repo.list(SCENARIO_ENTITY_TYPE).await?;
    snapshots
        .into_iter()
        .map(|snapshot| {
            serde_json::from_value(snapshot.payload).map_err(|e| {
                DomainError::Infrastructure(format!("scenario deserialization failed: {e}"))
            })
        })
        .collect()
}

/// Saves a scenario snapshot, returning its id.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if serialization or the save
/// fails.
pub async fn save_scenario(
    repo: &dyn SnapshotRepository,
    clock: &dyn Clock,
    scenario: &Scenario,
) -> Result<Uuid, DomainError> {
    let payload = serde_json::to_value(scenario)
        .map_err(|e| DomainError::Infrastructure(format!("scenario serialization failed: {e}")))?;
    let snapshot = StoredSnapshot {
        entity_id: scenario.id,
        entity_type: SCENARIO_ENTITY_TYPE.to_owned(),
        payload,
        saved_at: clock.now(),
    };
    repo.save(&snapshot).await?;
    Ok(scenario.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use playbook_core::clock::Clock;

    use crate::domain::injects::Inject;
    use crate::domain::scenarios::Story;

    #[derive(Default)]
    struct MapRepository(Mutex<HashMap<Uuid, StoredSnapshot>>);

    #[async_trait]
    impl SnapshotRepository for MapRepository {
        async fn load(&self, entity_id: Uuid) -> Result<StoredSnapshot, DomainError> {
            self.0
                .lock()
                .unwrap()
                .get(&entity_id)
                .cloned()
                .ok_or(DomainError::NotFound(entity_id))
        }

        async fn save(&self, snapshot: &StoredSnapshot) -> Result<(), DomainError> {
            self.0
                .lock()
                .unwrap()
                .insert(snapshot.entity_id, snapshot.clone());
            Ok(())
        }

        async fn list(&self, entity_type: &str) -> Result<Vec<StoredSnapshot>, DomainError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .values()
                .filter(|snapshot| snapshot.entity_type == entity_type)
                .cloned()
                .collect())
        }
    }

    struct NowClock;

    impl Clock for NowClock {
        fn now(&self) -> chrono::DateTime<Utc> {
            Utc::now()
        }
    }

    fn sample_scenario() -> Scenario {
        let mut scenario = Scenario::new(Uuid::new_v4(), "Sample", "round trip");
        scenario.add_story(Story::new(
            "Only Story",
            "intro",
            vec![Inject::new("Intro", "hello")],
        ));
        scenario
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let repo = MapRepository::default();
        let scenario = sample_scenario();

        let id = save_scenario(&repo, &NowClock, &scenario).await.unwrap();
        let loaded = load_scenario(&repo, id).await.unwrap();
        assert_eq!(loaded, scenario);
    }

    #[tokio::test]
    async fn test_list_only_sees_scenario_snapshots() {
        let repo = MapRepository::default();
        repo.save(&StoredSnapshot {
            entity_id: Uuid::new_v4(),
            entity_type: "GAME".to_owned(),
            payload: serde_json::json!({}),
            saved_at: Utc::now(),
        })
        .await
        .unwrap();
        save_scenario(&repo, &NowClock, &sample_scenario())
            .await
            .unwrap();

        let listed = list_scenarios(&repo).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Sample");
    }

    #[tokio::test]
    async fn test_load_missing_scenario_is_not_found() {
        let result = load_scenario(&MapRepository::default(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
