//! Calls across catalogue versions sharing one private store.

use rstest::{fixture, rstest};
use svcchain::plan::GenerationPlan;
use svcchain::runtime::{Code, INCOMPATIBLE_RESOURCE, Record, Registry, Status};

use super::helpers::{Catalogue, ISBN, V1, V2, library_plan, shelf_value, text};

#[fixture]
fn plan() -> GenerationPlan {
    library_plan()
}

fn v1_book() -> Record {
    Record::new("library.v1.AddBookRequest")
        .with("isbn", ISBN)
        .with("title", "Great Expectations")
        .with("author", "Charles Dickens")
        .with("shelf", shelf_value("FICTION"))
}

fn get(package: &str) -> Record {
    Record::new(format!("{package}.GetBookRequest")).with("isbn", ISBN)
}

#[rstest]
fn books_added_through_v1_keep_their_author(plan: GenerationPlan) {
    let mut services = Registry::new(&plan)
        .build(Catalogue::default())
        .expect("chain builds");

    let added = services.call(V1, "AddBook", &v1_book()).expect("add succeeds");
    let fetched = services.call(V1, "GetBook", &get(V1)).expect("get succeeds");

    assert_eq!(added, fetched);
    assert_eq!(fetched.message, "library.v1.Book");
    assert_eq!(text(&fetched, "author"), Some("Charles Dickens"));
    let stored = services.backend().book(ISBN).expect("book is stored");
    assert_eq!(text(stored, "author"), Some("Charles Dickens"));
}

#[rstest]
fn v2_readers_see_v1_books_without_the_author(plan: GenerationPlan) {
    let mut services = Registry::new(&plan)
        .build(Catalogue::default())
        .expect("chain builds");
    services.call(V1, "AddBook", &v1_book()).expect("add succeeds");

    let fetched = services.call(V2, "GetBook", &get(V2)).expect("get succeeds");

    assert_eq!(
        fetched,
        Record::new("library.v2.Book")
            .with("isbn", ISBN)
            .with("title", "Great Expectations")
            .with("shelf", shelf_value("FICTION"))
    );
}

#[rstest]
fn v2_books_without_an_author_are_incompatible_with_v1(plan: GenerationPlan) {
    let mut services = Registry::new(&plan)
        .build(Catalogue::default())
        .expect("chain builds");
    let request = Record::new("library.v2.AddBookRequest")
        .with("isbn", ISBN)
        .with("title", "Great Expectations")
        .with("pages", 544_i64);
    services.call(V2, "AddBook", &request).expect("add succeeds");

    let result = services.call(V1, "GetBook", &get(V1));

    assert_eq!(
        result,
        Err(Status::new(Code::FailedPrecondition, INCOMPATIBLE_RESOURCE))
    );
}

#[rstest]
fn newer_shelves_are_received_by_their_claiming_value(plan: GenerationPlan) {
    let store = Catalogue::default().with_book(
        Record::new("private.Book")
            .with("isbn", ISBN)
            .with("title", "A Brief History of Time")
            .with("author", "Stephen Hawking")
            .with("shelf", shelf_value("NONFICTION")),
    );
    let mut services = Registry::new(&plan).build(store).expect("chain builds");

    let v1 = services.call(V1, "GetBook", &get(V1)).expect("v1 get succeeds");
    let v2 = services.call(V2, "GetBook", &get(V2)).expect("v2 get succeeds");

    assert_eq!(v1.get("shelf"), Some(&shelf_value("REFERENCE")));
    assert_eq!(v2.get("shelf"), Some(&shelf_value("NONFICTION")));
}

#[rstest]
#[case::short_isbn(
    V1,
    Record::new("library.v1.AddBookRequest")
        .with("isbn", "12345")
        .with("title", "T"),
    "isbn has an invalid length"
)]
#[case::missing_title(
    V1,
    Record::new("library.v1.AddBookRequest").with("isbn", ISBN),
    "title is required"
)]
#[case::negative_pages(
    V2,
    Record::new("library.v2.AddBookRequest")
        .with("isbn", ISBN)
        .with("title", "T")
        .with("pages", -3_i64),
    "pages is out of range, min 1"
)]
fn invalid_requests_are_rejected_before_the_store(
    plan: GenerationPlan,
    #[case] package: &str,
    #[case] request: Record,
    #[case] message: &str,
) {
    let mut services = Registry::new(&plan)
        .build(Catalogue::default())
        .expect("chain builds");

    let result = services.call(package, "AddBook", &request);

    assert_eq!(result, Err(Status::invalid_argument(message)));
    assert!(services.backend().book(ISBN).is_none());
}

#[rstest]
fn unknown_books_are_not_found_in_every_version(plan: GenerationPlan) {
    let mut services = Registry::new(&plan)
        .build(Catalogue::default())
        .expect("chain builds");

    for package in [V1, V2] {
        let status = services
            .call(package, "GetBook", &get(package))
            .expect_err("nothing was added");

        assert_eq!(status.code, Code::NotFound);
        assert_eq!(status.message, format!("book {ISBN} not found"));
    }
}
