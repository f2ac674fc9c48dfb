// Unit tests for user-desk
// These drive the directory session through the public API with an in-memory gateway.

mod common;

#[cfg(test)]
mod directory_tests {
    use super::common::{ScriptedGateway, user, users};
    use user_desk::directory::Directory;
    use user_desk::error::{ActionError, TransportError};
    use user_desk::form::FormMode;
    use user_desk::model::UserId;

    async fn loaded(gw: &ScriptedGateway) -> Directory {
        let mut dir = Directory::new(10);
        dir.load(gw).await.expect("list");
        dir
    }

    fn ids(dir: &Directory) -> Vec<u64> {
        dir.visible().iter().map(|r| r.id.0).collect()
    }

    #[tokio::test]
    async fn test_twenty_five_users_paginate_in_tens() {
        let gw = ScriptedGateway::new(users(1..=25));
        let mut dir = loaded(&gw).await;

        assert_eq!(dir.total_pages(), 3);
        assert_eq!(ids(&dir), (1..=10).collect::<Vec<_>>());
        dir.go_to(3);
        assert_eq!(ids(&dir), vec![21, 22, 23, 24, 25]);
        dir.go_to(4);
        assert!(dir.visible().is_empty());
        assert_eq!(dir.pager().page(), 4);
    }

    #[tokio::test]
    async fn test_create_assigns_local_id_instead_of_server_id() {
        let gw = ScriptedGateway::new(users(1..=10));
        let mut dir = loaded(&gw).await;
        let before = dir.store().len();

        dir.open_for_create();
        dir.set_field("company.name", "Acme").unwrap();
        let id = dir.submit(&gw).await.unwrap();

        assert_eq!(id, Some(UserId(before as u64 + 1)));
        assert_eq!(dir.store().len(), before + 1);
        assert!(dir.store().get(UserId(99)).is_none());
        let created = dir.store().get(UserId(11)).unwrap();
        assert_eq!(created.company.name, "Acme");
        assert!(!dir.form().is_open());
        assert_eq!(gw.calls().last().map(String::as_str), Some("POST"));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_store_and_open_form() {
        let gw = ScriptedGateway::new(users(1..=10));
        let mut dir = loaded(&gw).await;
        let snapshot = dir.store().clone();
        gw.fail("update");

        assert!(dir.open_for_edit(UserId(5)));
        dir.set_field("email", "a@b.com").unwrap();
        let err = dir.submit(&gw).await.unwrap_err();

        assert!(matches!(err, TransportError::Network(_)));
        assert_eq!(dir.store(), &snapshot);
        assert_eq!(dir.form().mode(), Some(FormMode::Edit));
        assert_eq!(dir.form().record().map(|r| r.email.as_str()), Some("a@b.com"));
        assert_eq!(dir.form().last_error(), Some(&err));
        assert!(!dir.is_submitting());
        assert_eq!(gw.calls().last().map(String::as_str), Some("PUT 5"));
    }

    #[tokio::test]
    async fn test_successful_update_replaces_in_place() {
        let gw = ScriptedGateway::new(users(1..=10));
        let mut dir = loaded(&gw).await;

        assert!(dir.open_for_edit(UserId(5)));
        dir.set_field("name", "Renamed").unwrap();
        // the store is not touched before the response arrives
        assert_eq!(dir.store().get(UserId(5)).unwrap().name, "User 5");

        assert_eq!(dir.submit(&gw).await.unwrap(), Some(UserId(5)));
        assert_eq!(dir.store().len(), 10);
        assert_eq!(dir.store().position(UserId(5)), Some(4));
        assert_eq!(dir.store().get(UserId(5)).unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let gw = ScriptedGateway::new(users(1..=3));
        let mut dir = loaded(&gw).await;

        let declined = dir.delete(&gw, UserId(2), |_| false).await;
        assert_eq!(declined, Err(ActionError::UserCancelled));
        assert_eq!(dir.store().len(), 3);
        assert_eq!(gw.calls(), vec!["GET".to_string()]);

        assert_eq!(dir.delete(&gw, UserId(2), |r| r.name == "User 2").await, Ok(true));
        assert!(dir.store().get(UserId(2)).is_none());
        assert_eq!(gw.calls().last().map(String::as_str), Some("DELETE 2"));
    }

    #[tokio::test]
    async fn test_delete_of_missing_id_is_quiet_noop() {
        let gw = ScriptedGateway::new(users(1..=5));
        let mut dir = loaded(&gw).await;
        let before = dir.store().clone();

        let mut asked = false;
        let res = dir
            .delete(&gw, UserId(7), |_| {
                asked = true;
                true
            })
            .await;
        assert_eq!(res, Ok(false));
        assert!(!asked);
        assert_eq!(dir.store(), &before);
        assert_eq!(gw.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_list_leaves_store_empty() {
        let gw = ScriptedGateway::new(users(1..=5));
        gw.fail("list");
        let mut dir = Directory::new(10);
        assert!(dir.load(&gw).await.is_err());
        assert!(dir.store().is_empty());
        assert!(dir.notice().is_some_and(|n| n.is_error()));
    }

    #[tokio::test]
    async fn test_cancel_never_contacts_gateway() {
        let gw = ScriptedGateway::new(vec![user(1)]);
        let mut dir = loaded(&gw).await;
        dir.open_for_create();
        dir.set_field("name", "Draft").unwrap();
        assert!(dir.cancel());
        assert_eq!(dir.submit(&gw).await, Ok(None));
        assert_eq!(dir.store().len(), 1);
        assert_eq!(gw.calls(), vec!["GET".to_string()]);
    }
}

#[cfg(test)]
mod pager_tests {
    use user_desk::pager::{Pager, total_pages, visible_range};

    #[test]
    fn test_empty_list_has_one_empty_page() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(visible_range(0, 1, 10), 0..0);
        let pager = Pager::default();
        assert_eq!(pager.page_size(), 10);
        assert!(pager.slice::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_next_page_stops_at_last() {
        let mut pager = Pager::new(10);
        for _ in 0..5 {
            pager.next_page(25);
        }
        assert_eq!(pager.page(), 3);
    }
}
