//! Shared descriptors and the in-memory catalogue backend.
//!
//! The `library` chain publishes two versions of a `Catalog` service:
//!
//! - `library.v1` books carry a single deprecated `author`, which v1
//!   readers require;
//! - `library.v2` drops the author and adds `pages`;
//! - `private` keeps every field.
//!
//! v1's `Shelf.REFERENCE` also receives v2's `NONFICTION`.

use std::collections::HashMap;

use serde_json::{Value as Json, json};
use svcchain::descriptor::DescriptorSet;
use svcchain::plan::{GenerationPlan, GeneratorConfig, generate};
use svcchain::runtime::{Backend, Record, Status, Value};

pub const V1: &str = "library.v1";
pub const V2: &str = "library.v2";
pub const PRIVATE: &str = "private";

pub const ISBN: &str = "9780141439518";

fn string(name: &str, number: i32) -> Json {
    json!({ "name": name, "number": number, "label": "LABEL_OPTIONAL", "type": "TYPE_STRING" })
}

fn int32(name: &str, number: i32) -> Json {
    json!({ "name": name, "number": number, "label": "LABEL_OPTIONAL", "type": "TYPE_INT32" })
}

fn shelf(package: &str, number: i32) -> Json {
    json!({
        "name": "shelf", "number": number, "label": "LABEL_OPTIONAL",
        "type": "TYPE_ENUM", "typeName": format!(".{package}.Shelf")
    })
}

fn comment(path: &[i32], text: &str) -> Json {
    json!({ "path": path, "leadingComments": format!(" {text}\n") })
}

/// One file of the `library` chain. `book` lists the fields shared by
/// `AddBookRequest` and `Book`.
fn file(package: &str, book: &[Json], shelves: &[&str], comments: &[Json]) -> Json {
    let values: Vec<Json> = (0..)
        .zip(shelves)
        .map(|(number, name)| json!({ "name": name, "number": number }))
        .collect();
    json!({
        "name": format!("{}/catalog.proto", package.replace('.', "/")),
        "package": package,
        "messageType": [
            { "name": "AddBookRequest", "field": book },
            { "name": "GetBookRequest", "field": [string("isbn", 1)] },
            { "name": "Book", "field": book }
        ],
        "enumType": [{ "name": "Shelf", "value": values }],
        "service": [{
            "name": "Catalog",
            "method": [
                {
                    "name": "AddBook",
                    "inputType": format!(".{package}.AddBookRequest"),
                    "outputType": format!(".{package}.Book")
                },
                {
                    "name": "GetBook",
                    "inputType": format!(".{package}.GetBookRequest"),
                    "outputType": format!(".{package}.Book")
                }
            ]
        }],
        "sourceCodeInfo": { "location": comments }
    })
}

fn isbn_rules(message: i32) -> [Json; 2] {
    [
        comment(&[4, message, 2, 0], "gen:svc validate required=true min=10 max=13"),
        comment(&[4, message, 2, 1], "gen:svc validate required=true"),
    ]
}

/// Descriptor set of the `library` chain, files in no particular order.
pub fn library_set() -> DescriptorSet {
    let v1 = file(
        V1,
        &[string("isbn", 1), string("title", 2), string("author", 3), shelf(V1, 4)],
        &["FICTION", "REFERENCE"],
        &isbn_rules(0)
            .into_iter()
            .chain([
                comment(&[4, 0, 2, 2], "gen:svc deprecated"),
                comment(&[4, 2, 2, 2], "gen:svc deprecated\ngen:svc receive required=true"),
                comment(&[5, 0, 2, 1], "gen:svc receive name=NONFICTION"),
            ])
            .collect::<Vec<_>>(),
    );
    let v2 = file(
        V2,
        &[string("isbn", 1), string("title", 2), int32("pages", 3), shelf(V2, 4)],
        &["FICTION", "NONFICTION", "REFERENCE"],
        &isbn_rules(0)
            .into_iter()
            .chain([comment(&[4, 0, 2, 2], "gen:svc validate min=1")])
            .collect::<Vec<_>>(),
    );
    let private = file(
        PRIVATE,
        &[
            string("isbn", 1),
            string("title", 2),
            string("author", 3),
            int32("pages", 4),
            shelf(PRIVATE, 5),
        ],
        &["FICTION", "NONFICTION", "REFERENCE"],
        &[],
    );
    serde_json::from_value(json!({ "file": [v2, private, v1] }))
        .expect("library descriptors should deserialize")
}

/// Plan of the `library` chain with the default configuration.
pub fn library_plan() -> GenerationPlan {
    generate(&library_set(), &GeneratorConfig::default()).expect("library chain should plan")
}

pub fn shelf_value(name: &str) -> Value {
    Value::Enum(name.to_owned())
}

/// Reads a string field.
pub fn text<'r>(record: &'r Record, field: &str) -> Option<&'r str> {
    record.get(field).and_then(Value::as_str)
}

/// Private catalogue keeping books in memory, keyed by ISBN.
#[derive(Debug, Default)]
pub struct Catalogue {
    books: HashMap<String, Record>,
}

impl Catalogue {
    /// Stores a private book directly.
    pub fn with_book(mut self, book: Record) -> Self {
        let isbn = text(&book, "isbn").unwrap_or_default().to_owned();
        self.books.insert(isbn, book);
        self
    }

    pub fn book(&self, isbn: &str) -> Option<&Record> {
        self.books.get(isbn)
    }
}

impl Backend for Catalogue {
    fn call(&mut self, method: &str, request: &Record) -> Result<Record, Status> {
        let isbn = text(request, "isbn").unwrap_or_default().to_owned();
        match method {
            "AddBook" => {
                let mut book = Record::new("private.Book");
                book.fields.clone_from(&request.fields);
                self.books.insert(isbn, book.clone());
                Ok(book)
            }
            "GetBook" => self
                .books
                .get(&isbn)
                .cloned()
                .ok_or_else(|| Status::not_found(format!("book {isbn} not found"))),
            other => Err(Status::not_found(format!("unknown method {other}"))),
        }
    }
}
