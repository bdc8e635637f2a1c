use barky_core::db::{open_db, open_db_in_memory};
use barky_core::{
    run_unit_of_work, Bookmark, BookmarkChanges, BookmarkRepository, BookmarkService, ChangeError,
    PassThroughFactory, RepoError, ServiceError, SqliteBookmarkRepository, UnitOfWork,
};
use chrono::NaiveDate;

fn awesome_django() -> Bookmark {
    Bookmark::new(
        1,
        "Awesome Django",
        "https://awesomedjango.org/",
        "Best place on the web for Django.",
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
    )
}

fn bookmark(id: i64) -> Bookmark {
    Bookmark::new(
        id,
        format!("bookmark {id}"),
        format!("https://example.org/{id}"),
        "",
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
    )
}

#[test]
fn service_commits_each_write() {
    let conn = open_db_in_memory().unwrap();
    let service = BookmarkService::new(&conn);

    service.add_bookmark(awesome_django()).unwrap();

    assert!(conn.is_autocommit());
    let repo = SqliteBookmarkRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn reads_resolve_their_unit_of_work() {
    let conn = open_db_in_memory().unwrap();
    let service = BookmarkService::new(&conn);
    service.add_bookmark(awesome_django()).unwrap();

    assert_eq!(service.get_bookmark(1).unwrap(), Some(awesome_django()));
    assert!(conn.is_autocommit());
    assert_eq!(service.list_bookmarks().unwrap().len(), 1);
    assert!(conn.is_autocommit());
}

#[test]
fn each_call_starts_with_an_empty_seen_set() {
    let conn = open_db_in_memory().unwrap();
    let service = BookmarkService::new(&conn);

    let seen_sizes: Vec<usize> = (1..=5)
        .map(|id| {
            service
                .with_bookmarks(|repo| {
                    assert!(repo.seen().is_empty());
                    repo.add(bookmark(id))?;
                    Ok(repo.seen().len())
                })
                .unwrap()
        })
        .collect();

    assert_eq!(seen_sizes, vec![1; 5]);
    assert_eq!(service.list_bookmarks().unwrap().len(), 5);
}

#[test]
fn failed_call_is_rolled_back() {
    let conn = open_db_in_memory().unwrap();
    let service = BookmarkService::new(&conn);

    let result: Result<(), RepoError> = service.with_bookmarks(|repo| {
        repo.add(bookmark(1))?;
        Err(RepoError::InvalidData("rejected by caller".to_string()))
    });

    assert!(matches!(result, Err(RepoError::InvalidData(_))));
    assert!(conn.is_autocommit());
    assert!(service.list_bookmarks().unwrap().is_empty());
}

#[test]
fn service_holds_no_lock_between_calls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("barky.db");
    let service_conn = open_db(&path).unwrap();
    let other_conn = open_db(&path).unwrap();
    let service = BookmarkService::new(&service_conn);

    service.add_bookmark(bookmark(1)).unwrap();
    run_unit_of_work(&other_conn, |uow| -> Result<(), RepoError> {
        uow.bookmarks().add(bookmark(2))?;
        uow.commit()
    })
    .unwrap();

    let ids: Vec<_> = service
        .list_bookmarks()
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn service_scenario_add_edit_delete() {
    let conn = open_db_in_memory().unwrap();
    let service = BookmarkService::new(&conn);

    service.add_bookmark(awesome_django()).unwrap();
    assert_eq!(service.list_bookmarks().unwrap().len(), 1);

    service
        .edit_bookmark_fields(
            1,
            [
                ("title", "New Title Here"),
                ("url", "https://url.com"),
                ("notes", "Edited this bookmark."),
            ],
        )
        .unwrap();
    let edited = service.get_bookmark(1).unwrap().unwrap();
    assert_eq!(edited.title, "New Title Here");
    assert_eq!(edited.url, "https://url.com");
    assert_eq!(edited.notes, "Edited this bookmark.");

    service.delete_bookmark(1).unwrap();
    assert!(service.list_bookmarks().unwrap().is_empty());
}

#[test]
fn edit_fields_rejects_unknown_field_before_touching_store() {
    let conn = open_db_in_memory().unwrap();
    let service = BookmarkService::new(&conn);
    service.add_bookmark(awesome_django()).unwrap();

    let err = service
        .edit_bookmark_fields(1, [("title", "Changed"), ("rating", "5")])
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Change(ChangeError::UnknownField(ref name)) if name == "rating"
    ));
    assert_eq!(service.get_bookmark(1).unwrap(), Some(awesome_django()));
}

#[test]
fn edit_and_delete_of_missing_id_are_silent() {
    let conn = open_db_in_memory().unwrap();
    let service = BookmarkService::new(&conn);

    service
        .edit_bookmark(7, &BookmarkChanges::default().with_notes("nobody"))
        .unwrap();
    service.delete_bookmark(7).unwrap();

    assert!(service.list_bookmarks().unwrap().is_empty());
}

#[test]
fn service_over_passthrough_factory() {
    let service = BookmarkService::new(PassThroughFactory);

    service.add_bookmark(awesome_django()).unwrap();

    assert_eq!(service.get_bookmark(1).unwrap(), None);
    assert!(service.list_bookmarks().unwrap().is_empty());
    let seen = service
        .with_bookmarks(|repo| {
            repo.add(awesome_django())?;
            Ok(repo.seen().len())
        })
        .unwrap();
    assert_eq!(seen, 0);
}
