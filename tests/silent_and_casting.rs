mod util;

use std::cell::Cell;
use std::rc::Rc;

use model_array::prelude::*;
use serde_json::{Value, json};
use util::*;

fn typed_users() -> ModelArray<User> {
    ModelArray::build(
        [
            Input::raw(json!({"id": 3, "name": "pg"})),
            Input::raw(json!({"id": 2, "name": "mehdi"})),
            Input::raw(json!({"id": 1, "name": "jeremy"})),
        ],
        Options::new().member_type(User::member_type()),
    )
    .unwrap()
}

fn count_all<M: Member + 'static>(users: &mut ModelArray<M>) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    for kind in EventKind::ALL {
        let count = Rc::clone(&count);
        users.on(kind, move |_, _| count.set(count.get() + 1));
    }
    count
}

#[test]
fn raw_input_is_cast_through_member_type() {
    let mut users = typed_users();
    assert_eq!(users.member_type().map(MemberType::name), Some("User"));
    assert_eq!(users.get_key("c2").map(|u| u.name.as_str()), Some("mehdi"));

    users
        .reconcile([
            Input::raw(json!({"id": 3, "name": "Pierre-Guillaume"})),
            Input::from(User::new(4, "thomas")),
        ])
        .unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Pierre-Guillaume", "thomas"]);
}

#[test]
fn cast_errors_surface_and_leave_members_alone() {
    let mut users = typed_users();
    let err = users
        .append([Input::raw(json!({"id": 4, "name": "thomas"})), Input::raw(json!({"id": "x"}))])
        .unwrap_err();
    assert!(matches!(err, ModelArrayError::Cast(CastError::Json(_))));
    assert_eq!(users.len(), 3);
    assert!(users.get_key(4).is_none());
}

#[test]
fn raw_input_already_present_is_not_cast() {
    let mut users = typed_users();
    // no name: the member type would reject these
    assert_eq!(users.append([Input::raw(json!({"id": 3}))]).unwrap(), 0);
    assert_eq!(users.prepend([Input::raw(json!({"cid": "c2"}))]).unwrap(), 0);
    assert!(users.add(Input::raw(json!({"id": 9}))).is_err());
    assert_eq!(users.len(), 3);
}

#[test]
fn null_raw_input_is_skipped() {
    let mut users = typed_users();
    let n = users
        .append([Input::raw(Value::Null), Input::raw(json!({"id": 4, "name": "thomas"}))])
        .unwrap();
    assert_eq!(n, 1);
}

#[test]
fn deserializing_member_type() {
    #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
    struct Tag {
        id: u32,
    }
    impl Identify for Tag {
        fn id(&self) -> Option<Key> {
            Some(Key::from(self.id))
        }
    }
    impl Member for Tag {}

    let mut tags = ModelArray::typed(MemberType::<Tag>::deserialize());
    tags.append([Input::raw(json!({"id": 1})), Input::raw(json!({"id": 1}))])
        .unwrap();
    assert_eq!(tags.as_slice(), &[Tag { id: 1 }]);
    assert!(tags.add(Input::raw(json!({"tag": 1}))).is_err());
}

#[test]
fn untyped_raw_input_needs_from_raw() {
    let mut days: ModelArray<Day> = ModelArray::new();
    let err = days.add(Input::raw("2012-01-01")).unwrap_err();
    assert!(matches!(err, ModelArrayError::Cast(CastError::Untyped(_))));
}

#[test]
fn silent_suppresses_exactly_one_emission() {
    let f = strings_fixture();
    let mut users = f.users;
    let count = count_all(&mut users);

    users.silent().add("thomas".to_string()).unwrap();
    assert_eq!(count.get(), 0);
    users.add("celine".to_string()).unwrap();
    assert_eq!(count.get(), 1);
}

#[test]
fn silent_is_consumed_by_a_noop() {
    let f = numbers_fixture();
    let mut users = f.users;
    let count = count_all(&mut users);

    // every candidate is already present
    users.silent().append([1i64, 2]).unwrap();
    assert!(!users.is_silent());
    users.remove_last();
    assert_eq!(count.get(), 1);
}

#[test]
fn silent_survives_sort_until_next_mutation() {
    let f = strings_fixture();
    let mut users = f.users;
    let count = count_all(&mut users);

    users.silent().sort();
    assert_eq!(count.get(), 1);
    users.remove_first();
    assert_eq!(count.get(), 1);
    users.remove_first();
    assert_eq!(count.get(), 2);
}

#[test]
fn unsubscribed_listeners_stop_firing() {
    let f = objects_fixture();
    let mut users = f.users;
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    let id = users.on(EventKind::Add, move |_, _| c.set(c.get() + 1));
    users.add(f.thomas.clone()).unwrap();
    assert_eq!(users.off(EventKind::Add, Some(id)), 1);
    users.remove([&f.thomas]);
    users.add(f.thomas).unwrap();
    assert_eq!(count.get(), 1);
}

#[test]
fn named_listeners() {
    let f = users_fixture();
    let mut users = f.users;
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    users
        .on_named("remove", move |removed, array| {
            assert_eq!(removed.len(), 1);
            assert_eq!(array.len(), 2);
            c.set(c.get() + 1);
        })
        .unwrap();
    users.remove([&Probe::by_cid("c2")]);
    assert_eq!(count.get(), 1);
    assert!(matches!(
        users.on_named("changed", |_, _| {}),
        Err(ModelArrayError::UnknownEvent(name)) if name == "changed"
    ));
}

#[test]
fn serializes_like_a_json_array() {
    let f = users_fixture();
    let text = serde_json::to_string(&f.users).unwrap();
    assert_eq!(
        text,
        r#"[{"id":3,"name":"pg"},{"id":2,"name":"mehdi"},{"id":1,"name":"jeremy"}]"#
    );
}

#[test]
fn invariants_hold_after_scenarios() {
    let mut f = users_fixture();
    f.users.splice(1, 1, [f.thomas.clone(), f.pg.clone()]).unwrap();
    f.users.reconcile([f.pg2.clone(), f.jeremy.clone()]).unwrap();
    assert_eq!(f.users.validate_invariants(), Ok(()));
    assert_eq!(f.users.identity_index().len(), 4);
}
