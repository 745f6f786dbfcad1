//! tests/operation_tests.rs
//! Pruebas de persistencia de análisis en SQLite.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_rt::test;

    use crate::config::forensics_config::ForensicsConfig;
    use crate::models::analysis_model::UploadedProject;
    use crate::services::analysis_service::AnalysisService;
    use crate::services::forensics_service::ForensicsService;
    use crate::tests::fixtures::{sample_sb3, CAT_LOGIC};

    use crate::models::analysis_model::AnalysisSettings;
    use crate::models::operation_model::{STATUS_DONE, STATUS_FAILED, STATUS_PENDING, STATUS_RUNNING};
    use crate::services::forensics_service::build_report;
    use crate::services::operation_service::OperationService;
    use crate::tests::fixtures::memory_pool;

    const SETTINGS: AnalysisSettings = AnalysisSettings {
        similarity_threshold: 90.0,
        min_shared_assets: 2,
    };

    async fn create_test_service() -> OperationService {
        let service = OperationService::new(memory_pool().await);
        service.run_migrations().await.expect("migraciones");
        service
    }

    #[test]
    async fn test_analysis_lifecycle() {
        let service = create_test_service().await;

        let id = service.create_analysis(4, &SETTINGS).await.unwrap();
        let record = service.get_analysis(&id).await.unwrap().expect("existe");
        assert_eq!(record.status, STATUS_PENDING);
        assert_eq!(record.file_count, 4);
        assert_eq!(record.similarity_threshold, 90.0);
        assert_eq!(record.min_shared_assets, 2);
        assert!(record.report.is_none());
        assert!(!record.is_finished());

        service.mark_running(&id).await.unwrap();
        let record = service.get_analysis(&id).await.unwrap().unwrap();
        assert_eq!(record.status, STATUS_RUNNING);

        let report = build_report(vec![], vec![], 4, SETTINGS);
        service.complete_analysis(&id, &report).await.unwrap();
        let record = service.get_analysis(&id).await.unwrap().unwrap();
        assert_eq!(record.status, STATUS_DONE);
        assert!(record.is_finished());
        assert_eq!(record.report, Some(report));
    }

    #[test]
    async fn test_mark_failed_keeps_error() {
        let service = create_test_service().await;
        let id = service.create_analysis(2, &SETTINGS).await.unwrap();

        service.mark_failed(&id, "Timeout esperando permiso").await.unwrap();
        let record = service.get_analysis(&id).await.unwrap().unwrap();
        assert_eq!(record.status, STATUS_FAILED);
        assert_eq!(record.error_message.as_deref(), Some("Timeout esperando permiso"));
        assert!(!record.is_finished());
    }

    #[test]
    async fn test_unknown_id_is_none() {
        let service = create_test_service().await;
        assert!(service.get_analysis("no-such-id").await.unwrap().is_none());
    }

    #[test]
    async fn test_list_pagination_newest_first() {
        let service = create_test_service().await;
        let mut ids = vec![];
        for n in 0..5 {
            ids.push(service.create_analysis(n + 2, &SETTINGS).await.unwrap());
        }

        let first = service.list_analyses(1, 2).await.unwrap();
        assert_eq!(first.total, 5);
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.items[0].id, ids[4]);
        assert_eq!(first.items[1].id, ids[3]);

        let last = service.list_analyses(3, 2).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].id, ids[0]);

        // page 0 se trata como 1 y page_size se acota
        let clamped = service.list_analyses(0, 10_000).await.unwrap();
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.page_size, 100);
        assert_eq!(clamped.items.len(), 5);
    }

    #[test]
    async fn test_setup_database_creates_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("forensics.db");
        let url = format!("sqlite:{}", db_path.to_string_lossy());

        let pool = crate::setup_database(Some(&url)).await.expect("pool");
        let service = OperationService::new(pool);
        service.run_migrations().await.unwrap();

        assert!(db_path.exists());
        let id = service.create_analysis(3, &SETTINGS).await.unwrap();
        assert!(service.get_analysis(&id).await.unwrap().is_some());
    }

    #[test]
    async fn test_failed_analysis_is_recorded() {
        let operations = create_test_service().await;
        // Sin permisos de extracción: el análisis vence por timeout
        let forensics =
            ForensicsService::new_test(ForensicsConfig::default(), 0, Duration::from_millis(50));
        let analysis = AnalysisService::new(forensics, operations.clone());

        let files = vec![
            UploadedProject::test_new("a.sb3", sample_sb3("Cat", CAT_LOGIC, &[])),
            UploadedProject::test_new("b.sb3", sample_sb3("Cat", CAT_LOGIC, &[])),
        ];
        assert!(analysis.run(files, SETTINGS).await.is_err());

        let list = operations.list_analyses(1, 10).await.unwrap();
        assert_eq!(list.total, 1);
        let record = operations
            .get_analysis(&list.items[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, STATUS_FAILED);
        assert!(record
            .error_message
            .unwrap_or_default()
            .contains("Timeout esperando permiso"));
        assert!(record.report.is_none());
    }
}
