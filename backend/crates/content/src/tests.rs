//! Use case tests for the content crate

#[cfg(test)]
mod manage_entity_tests {
    use std::sync::Arc;

    use kernel::validation::UploadedFile;

    use crate::application::ManageEntityUseCase;
    use crate::domain::*;
    use crate::error::{ContentError, ContentResult};
    use crate::infra::{MemoryContentRepository, MemoryImageStore};

    fn png(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3],
        }
    }

    fn manage<E>(
        repo: &MemoryContentRepository,
        images: &MemoryImageStore,
    ) -> ManageEntityUseCase<E, MemoryContentRepository, MemoryImageStore>
    where
        E: Entity,
        MemoryContentRepository: EntityRepository<E>,
    {
        ManageEntityUseCase::new(Arc::new(repo.clone()), Arc::new(images.clone()))
    }

    fn sponsor_fields(name: &str) -> SponsorFields {
        SponsorFields {
            name: name.to_string(),
            website_url: None,
        }
    }

    async fn lifecycle<E>(fields: E::Fields, upload: Option<UploadedFile>)
    where
        E: Entity,
        MemoryContentRepository: EntityRepository<E>,
    {
        let repo = MemoryContentRepository::new();
        let images = MemoryImageStore::new();
        let manage = manage::<E>(&repo, &images);

        let id = manage.create(fields, upload).await.unwrap();
        let entity = manage.get(id).await.unwrap();
        assert_eq!(entity.id(), id);
        assert_eq!(images.len().await, usize::from(E::KIND.has_image()));

        if E::KIND.has_image() {
            let bytes = manage.read_image(&entity).await.unwrap().unwrap();
            assert!(!bytes.is_empty());
        }

        manage.delete(id).await.unwrap();
        assert!(matches!(
            manage.get(id).await,
            Err(ContentError::NotFound { .. })
        ));
        assert!(images.is_empty().await);
    }

    #[tokio::test]
    async fn test_sponsor_lifecycle() {
        lifecycle::<Sponsor>(sponsor_fields("Acme"), Some(png("acme.png"))).await;
    }

    #[tokio::test]
    async fn test_management_lifecycle() {
        let fields = ManagementMemberFields {
            name: "Jana".to_string(),
            position: "Chair".to_string(),
            order: 1,
        };
        lifecycle::<ManagementMember>(fields, None).await;
    }

    #[tokio::test]
    async fn test_team_lifecycle() {
        let fields = TeamFields {
            name: "U12".to_string(),
            vintage: "2014".to_string(),
            trainer: "Kim".to_string(),
            trainer_phone: Some("+420 123 456".to_string()),
            order: 3,
        };
        lifecycle::<Team>(fields, Some(png("u12.png"))).await;
    }

    #[tokio::test]
    async fn test_project_lifecycle() {
        let fields = ProjectFields {
            name: "New pitch".to_string(),
            description: "Artificial turf".to_string(),
        };
        lifecycle::<Project>(fields, Some(png("pitch.png"))).await;
    }

    #[tokio::test]
    async fn test_image_required_for_image_kinds() {
        let repo = MemoryContentRepository::new();
        let images = MemoryImageStore::new();

        let result = manage::<Sponsor>(&repo, &images)
            .create(sponsor_fields("Acme"), None)
            .await;
        assert!(matches!(result, Err(ContentError::ImageRequired)));
        assert!(EntityRepository::<Sponsor>::list(&repo).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_management_ignores_upload() {
        let repo = MemoryContentRepository::new();
        let images = MemoryImageStore::new();
        let fields = ManagementMemberFields {
            name: "Jana".to_string(),
            position: "Chair".to_string(),
            order: 1,
        };

        manage::<ManagementMember>(&repo, &images)
            .create(fields, Some(png("jana.png")))
            .await
            .unwrap();
        assert!(images.is_empty().await);
    }

    #[tokio::test]
    async fn test_mismatched_image_is_not_stored() {
        let repo = MemoryContentRepository::new();
        let images = MemoryImageStore::new();
        let result = manage::<Sponsor>(&repo, &images)
            .create(sponsor_fields("Acme"), Some(png("acme.jpg")))
            .await;
        assert!(matches!(result, Err(ContentError::UnsupportedImage)));
        assert!(images.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_without_upload_keeps_image() {
        let repo = MemoryContentRepository::new();
        let images = MemoryImageStore::new();
        let manage = manage::<Sponsor>(&repo, &images);

        let id = manage
            .create(sponsor_fields("Acme"), Some(png("acme.png")))
            .await
            .unwrap();
        let before = manage.get(id).await.unwrap();

        let after = manage.update(id, sponsor_fields("Acme Ltd"), None).await.unwrap();
        assert_eq!(after.name, "Acme Ltd");
        assert_eq!(after.image, before.image);
        assert!(images.contains(&before.image).await);
    }

    #[tokio::test]
    async fn test_update_missing_record_stores_nothing() {
        let repo = MemoryContentRepository::new();
        let images = MemoryImageStore::new();

        let result = manage::<Sponsor>(&repo, &images)
            .update(EntityId::new(42), sponsor_fields("Ghost"), Some(png("ghost.png")))
            .await;
        assert!(matches!(result, Err(ContentError::NotFound { id: 42, .. })));
        assert!(images.is_empty().await);
    }

    /// Store whose writes always fail
    #[derive(Clone, Default)]
    struct BrokenRepository;

    impl EntityRepository<Sponsor> for BrokenRepository {
        async fn create(
            &self,
            _fields: &SponsorFields,
            _image: Option<&ImageRef>,
        ) -> ContentResult<EntityId<Sponsor>> {
            Err(ContentError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn get(&self, _id: EntityId<Sponsor>) -> ContentResult<Option<Sponsor>> {
            Ok(None)
        }

        async fn list(&self) -> ContentResult<Vec<Sponsor>> {
            Ok(Vec::new())
        }

        async fn update(
            &self,
            _id: EntityId<Sponsor>,
            _fields: &SponsorFields,
            _image: Option<&ImageRef>,
        ) -> ContentResult<Option<Sponsor>> {
            Err(ContentError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn delete(&self, _id: EntityId<Sponsor>) -> ContentResult<Option<Sponsor>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_failed_create_removes_stored_image() {
        let images = MemoryImageStore::new();
        let manage = ManageEntityUseCase::<Sponsor, _, _>::new(
            Arc::new(BrokenRepository),
            Arc::new(images.clone()),
        );

        let result = manage
            .create(sponsor_fields("Acme"), Some(png("acme.png")))
            .await;
        assert!(matches!(result, Err(ContentError::Database(_))));
        assert!(images.is_empty().await);
    }
}
