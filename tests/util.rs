#![allow(dead_code)]
use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use model_array::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A user model: id plus a derived client id, updated in place by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: u32,
    #[serde(skip)]
    pub cid: String,
    pub name: String,
}

impl User {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            cid: format!("c{id}"),
            name: name.to_string(),
        }
    }

    /// Member type casting `{"id": .., "name": ..}` objects.
    pub fn member_type() -> MemberType<User> {
        #[derive(Deserialize)]
        struct Raw {
            id: u32,
            name: String,
        }
        MemberType::new("User", |raw: Value| {
            let Raw { id, name } = serde_json::from_value(raw)?;
            Ok(User::new(id, &name))
        })
    }
}

impl Identify for User {
    fn id(&self) -> Option<Key> {
        Some(Key::from(self.id))
    }

    fn cid(&self) -> Option<Key> {
        Some(Key::from(self.cid.as_str()))
    }
}

impl Member for User {
    fn update(&mut self, newer: Self) -> Option<Self> {
        self.name = newer.name;
        None
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// A calendar day, identified by its ISO form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Day(pub String);

impl Identify for Day {
    fn value_key(&self) -> Option<Key> {
        Some(Key::from(self.0.as_str()))
    }
}

impl Member for Day {}

/// The `[pg, mehdi, jeremy]` collection plus the members the scenarios use.
pub struct Fixture<M> {
    pub users: ModelArray<M>,
    pub pg: M,
    /// Same identity as `pg`, possibly different content.
    pub pg2: M,
    pub mehdi: M,
    pub jeremy: M,
    pub thomas: M,
    pub json: Value,
    /// Orders by name; `None` when `Member::compare` already does.
    pub compare: Option<fn(&M, &M) -> Ordering>,
}

impl<M: Member + Clone> Fixture<M> {
    fn new(pg: M, pg2: M, mehdi: M, jeremy: M, thomas: M, json: Value) -> Self {
        let users = ModelArray::from_members([pg.clone(), mehdi.clone(), jeremy.clone()]);
        Self {
            users,
            pg,
            pg2,
            mehdi,
            jeremy,
            thomas,
            json,
            compare: None,
        }
    }
}

fn by_name(a: &Value, b: &Value) -> Ordering {
    a["name"].as_str().cmp(&b["name"].as_str())
}

pub fn users_fixture() -> Fixture<User> {
    Fixture::new(
        User::new(3, "pg"),
        User::new(3, "Pierre-Guillaume"),
        User::new(2, "mehdi"),
        User::new(1, "jeremy"),
        User::new(4, "thomas"),
        json!([
            {"id": 3, "name": "pg"},
            {"id": 2, "name": "mehdi"},
            {"id": 1, "name": "jeremy"},
        ]),
    )
}

pub fn objects_fixture() -> Fixture<Value> {
    let mut fixture = Fixture::new(
        json!({"id": 3, "name": "pg"}),
        json!({"id": 3, "name": "Pierre-Guillaume"}),
        json!({"id": 2, "name": "mehdi"}),
        json!({"id": 1, "name": "jeremy"}),
        json!({"id": 4, "name": "thomas"}),
        json!([
            {"id": 3, "name": "pg"},
            {"id": 2, "name": "mehdi"},
            {"id": 1, "name": "jeremy"},
        ]),
    );
    fixture.compare = Some(by_name);
    fixture
}

pub fn anonymous_objects_fixture() -> Fixture<Value> {
    let mut fixture = Fixture::new(
        json!({"name": "pg"}),
        json!({"name": "pg"}),
        json!({"name": "mehdi"}),
        json!({"name": "jeremy"}),
        json!({"name": "thomas"}),
        json!([{"name": "pg"}, {"name": "mehdi"}, {"name": "jeremy"}]),
    );
    fixture.compare = Some(by_name);
    fixture
}

pub fn strings_fixture() -> Fixture<String> {
    Fixture::new(
        "pg".to_string(),
        "pg".to_string(),
        "mehdi".to_string(),
        "jeremy".to_string(),
        "thomas".to_string(),
        json!(["pg", "mehdi", "jeremy"]),
    )
}

pub fn numbers_fixture() -> Fixture<i64> {
    Fixture::new(3, 3, 2, 1, 4, json!([3, 2, 1]))
}

pub fn days_fixture() -> Fixture<Day> {
    let day = |s: &str| Day(s.to_string());
    Fixture::new(
        day("2012-01-01"),
        day("2012-01-01"),
        day("2011-01-01"),
        day("2010-01-01"),
        day("2013-01-01"),
        json!(["2012-01-01", "2011-01-01", "2010-01-01"]),
    )
}

/// Payloads received for `kind`, in emission order.
pub type Received<M> = Rc<RefCell<Vec<Vec<M>>>>;

pub fn record<M: Member + Clone + 'static>(users: &mut ModelArray<M>, kind: EventKind) -> Received<M> {
    let received: Received<M> = Rc::default();
    let sink = Rc::clone(&received);
    users.on(kind, move |members, _| sink.borrow_mut().push(members.to_vec()));
    received
}
