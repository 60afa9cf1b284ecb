use std::cmp::Ordering;

use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::task::Task;
use crate::model::view::{Filter, SortKey};

/// The inputs that derive a visible subset from the canonical list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub filter: Filter,
    pub sort: SortKey,
    pub search: String,
}

/// Does the task pass the search term? A blank term matches everything.
/// The term is lowercased but not trimmed.
pub fn matches_search(task: &Task, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    task.matches_text(&term.to_lowercase())
}

/// Does the task pass the filter? Archived tasks only pass `Archived`.
pub fn matches_filter(task: &Task, filter: Filter, today: NaiveDate) -> bool {
    match filter {
        Filter::All => !task.archived,
        Filter::Completed => task.completed && !task.archived,
        Filter::Pending => !task.completed && !task.archived,
        Filter::Overdue => task.is_overdue(today) && !task.archived,
        Filter::Archived => task.archived,
    }
}

/// Base letters only: decomposed, accents dropped, lowercased
fn primary_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercased but keeping accents, so "e" sorts before "é"
fn secondary_key(s: &str) -> String {
    s.nfd().flat_map(char::to_lowercase).collect()
}

/// Locale-style title ordering in three levels: base letters, then
/// accents, then case with lowercase first. "apple" < "Apple" < "Éclair"
/// < "zebra".
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| secondary_key(a).cmp(&secondary_key(b)))
        .then_with(|| b.cmp(a))
}

/// Stable sort of a derived view. `Manual` keeps the given order.
pub fn sort_tasks(tasks: &mut [&Task], sort: SortKey) {
    match sort {
        SortKey::Date => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Priority => tasks.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
        SortKey::Status => tasks.sort_by_key(|t| t.completed),
        SortKey::Title => tasks.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortKey::Manual => {}
    }
}

/// Search, then filter, then sort. Never touches the canonical list.
pub fn visible_tasks<'a>(tasks: &'a [Task], query: &ViewQuery, today: NaiveDate) -> Vec<&'a Task> {
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|t| matches_search(t, &query.search))
        .filter(|t| matches_filter(t, query.filter, today))
        .collect();
    sort_tasks(&mut visible, query.sort);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use crate::ops::task_ops::local_midnight;
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 20).unwrap()
    }

    fn task(id: u64, title: &str, day: u32) -> Task {
        Task::new(id, title, Utc.with_ymd_and_hms(2026, 5, day, 12, 0, 0).unwrap())
    }

    /// Five tasks covering every filter bucket
    fn sample_list() -> Vec<Task> {
        let mut pending = task(1, "Plan sprint", 1);
        pending.priority = Priority::Low;

        let mut done = task(2, "Ship release", 2);
        done.completed = true;
        done.priority = Priority::High;

        let mut late = task(3, "File taxes", 3);
        late.due_date = Some(local_midnight(NaiveDate::from_ymd_opt(2026, 5, 19).unwrap()));

        let mut shelved = task(4, "Learn piano", 4);
        shelved.archived = true;

        let mut archived_late = task(5, "Renew passport", 5);
        archived_late.archived = true;
        archived_late.due_date = Some(local_midnight(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));

        vec![pending, done, late, shelved, archived_late]
    }

    fn ids(tasks: &[&Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    fn query(filter: Filter, sort: SortKey, search: &str) -> ViewQuery {
        ViewQuery {
            filter,
            sort,
            search: search.to_string(),
        }
    }

    #[test]
    fn filter_buckets() {
        let list = sample_list();
        let run = |f| ids(&visible_tasks(&list, &query(f, SortKey::Manual, ""), today()));
        assert_eq!(run(Filter::All), vec![1, 2, 3]);
        assert_eq!(run(Filter::Completed), vec![2]);
        assert_eq!(run(Filter::Pending), vec![1, 3]);
        assert_eq!(run(Filter::Overdue), vec![3]);
        assert_eq!(run(Filter::Archived), vec![4, 5]);
    }

    #[test]
    fn archived_tasks_only_in_archived_filter() {
        let list = sample_list();
        for filter in [Filter::All, Filter::Completed, Filter::Pending, Filter::Overdue] {
            let visible = visible_tasks(&list, &query(filter, SortKey::Manual, ""), today());
            assert!(visible.iter().all(|t| !t.archived), "{filter} leaked an archived task");
        }
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let mut list = sample_list();
        list[0].description = "Backlog GROOMING".into();
        let visible = visible_tasks(&list, &query(Filter::All, SortKey::Manual, "grooming"), today());
        assert_eq!(ids(&visible), vec![1]);

        let visible = visible_tasks(&list, &query(Filter::All, SortKey::Manual, "SHIP"), today());
        assert_eq!(ids(&visible), vec![2]);
    }

    #[test]
    fn blank_search_is_noop() {
        let list = sample_list();
        let visible = visible_tasks(&list, &query(Filter::All, SortKey::Manual, "   "), today());
        assert_eq!(ids(&visible), vec![1, 2, 3]);
    }

    #[test]
    fn archived_tasks_remain_searchable() {
        let list = sample_list();
        let visible = visible_tasks(&list, &query(Filter::Archived, SortKey::Manual, "piano"), today());
        assert_eq!(ids(&visible), vec![4]);
    }

    #[test]
    fn sort_by_date_newest_first() {
        let list = sample_list();
        let visible = visible_tasks(&list, &query(Filter::All, SortKey::Date, ""), today());
        assert_eq!(ids(&visible), vec![3, 2, 1]);
    }

    #[test]
    fn unknown_priority_sorts_after_low() {
        let mut list = sample_list();
        list[0].priority = Priority::Other("Urgent".to_string());
        list[1].priority = Priority::Low;
        let visible = visible_tasks(&list, &query(Filter::All, SortKey::Priority, ""), today());
        assert_eq!(ids(&visible), vec![3, 2, 1]);
    }

    #[test]
    fn sort_by_priority_is_stable() {
        let list = sample_list();
        // 1 Low, 2 High, 3 Medium
        let visible = visible_tasks(&list, &query(Filter::All, SortKey::Priority, ""), today());
        assert_eq!(ids(&visible), vec![2, 3, 1]);

        let mut same = sample_list();
        for t in &mut same {
            t.priority = Priority::Medium;
        }
        let visible = visible_tasks(&same, &query(Filter::All, SortKey::Priority, ""), today());
        assert_eq!(ids(&visible), vec![1, 2, 3]);
    }

    #[test]
    fn sort_by_status_pending_first_keeps_relative_order() {
        let list = sample_list();
        let visible = visible_tasks(&list, &query(Filter::All, SortKey::Status, ""), today());
        assert_eq!(ids(&visible), vec![1, 3, 2]);
    }

    #[test]
    fn sort_by_title() {
        let list = sample_list();
        let visible = visible_tasks(&list, &query(Filter::All, SortKey::Title, ""), today());
        let titles: Vec<&str> = visible.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["File taxes", "Plan sprint", "Ship release"]);
    }

    #[test]
    fn compare_titles_is_case_insensitive_and_total() {
        assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_titles("Zebra", "apple"), Ordering::Greater);
        assert_eq!(compare_titles("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_titles("Apple", "apple"), Ordering::Greater);
        assert_eq!(compare_titles("same", "same"), Ordering::Equal);
    }

    #[test]
    fn compare_titles_folds_accents() {
        assert_eq!(compare_titles("Éclair", "Zebra"), Ordering::Less);
        assert_eq!(compare_titles("apple", "Éclair"), Ordering::Less);
        assert_eq!(compare_titles("eclair", "éclair"), Ordering::Less);
        assert_eq!(compare_titles("éclair", "Éclair"), Ordering::Less);
        assert_eq!(compare_titles("Ärger", "Zorn"), Ordering::Less);
        // precomposed and decomposed spellings share a base key
        assert_eq!(compare_titles("caf\u{e9}", "cafes"), Ordering::Less);
        assert_eq!(compare_titles("cafe\u{301}", "cafes"), Ordering::Less);
    }

    #[test]
    fn sort_by_title_places_accented_initials_among_letters() {
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        let list = vec![
            Task::new(1, "Zebra", at),
            Task::new(2, "Éclair", at),
            Task::new(3, "apple", at),
        ];
        let visible = visible_tasks(&list, &query(Filter::All, SortKey::Title, ""), today());
        let titles: Vec<&str> = visible.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["apple", "Éclair", "Zebra"]);
    }

    #[test]
    fn manual_sort_is_identity() {
        let list = sample_list();
        let visible = visible_tasks(&list, &query(Filter::All, SortKey::Manual, ""), today());
        assert_eq!(ids(&visible), vec![1, 2, 3]);
    }

    #[test]
    fn empty_list_yields_empty_view() {
        for filter in [Filter::All, Filter::Overdue, Filter::Archived] {
            assert!(visible_tasks(&[], &query(filter, SortKey::Title, "x"), today()).is_empty());
        }
    }
}
