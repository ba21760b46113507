use capstan::ReleaseId;
use capstan::release::{RELEASE_ID_LEN, plan_prune};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[test]
fn allocated_id_is_canonical() {
    let id = ReleaseId::now();

    assert_eq!(id.to_string().len(), RELEASE_ID_LEN);
    assert!(ReleaseId::parse(id.as_str()).is_some());
}

#[test]
fn ids_sort_chronologically() {
    let a = ReleaseId::parse("20231231235959").unwrap();
    let b = ReleaseId::parse("20240101000000").unwrap();
    let c = ReleaseId::parse("20240101000001").unwrap();

    assert!(a < b);
    assert!(b < c);
}

#[test]
fn three_deploys_retention_two() {
    // Releases A < B < C with retention 2: A goes, {B, C} stay.
    let entries = names(&["20240101000000", "20240102000000", "20240103000000"]);

    let doomed = plan_prune(&entries, 2, Some("20240103000000"));

    assert_eq!(doomed, names(&["20240101000000"]));
}

#[test]
fn current_target_survives_even_when_old() {
    let entries = names(&[
        "20240101000000",
        "20240102000000",
        "20240103000000",
    ]);

    let doomed = plan_prune(&entries, 1, Some("20240101000000"));

    assert_eq!(doomed, names(&["20240102000000"]));
}

#[test]
fn non_release_entries_are_ignored() {
    let entries = names(&["20240101000000", "current.tmp", "lost+found", "20240102000000"]);

    let doomed = plan_prune(&entries, 1, Some("20240102000000"));

    assert_eq!(doomed, names(&["20240101000000"]));
}
