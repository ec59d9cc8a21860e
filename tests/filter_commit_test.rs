use std::time::Duration;

use coursescope::filters::{FilterCommitter, FilterState, ListParams, ScoreRange};
use coursescope::table::Pagination;

const DELAY: Duration = Duration::from_millis(500);

fn on_page(page: u32) -> ListParams {
    ListParams {
        pagination: Pagination { page, ..Pagination::default() },
        ..ListParams::default()
    }
}

fn searching(text: &str) -> FilterState {
    FilterState {
        search_query: text.to_string(),
        ..FilterState::default()
    }
}

#[tokio::test(start_paused = true)]
async fn typing_burst_commits_once_with_last_value_and_resets_page() {
    let committer = FilterCommitter::new(on_page(3), DELAY);
    let mut rx = committer.subscribe();

    let mut handles = Vec::new();
    for text in ["а", "ал", "алг"] {
        handles.push(committer.edit(searching(text)).unwrap());
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    assert_eq!(committer.current().filters.search_query, "");
    assert_eq!(committer.draft().search_query, "алг");

    let mut fired = 0;
    for h in handles {
        if h.await.unwrap() {
            fired += 1;
        }
    }
    assert_eq!(fired, 1);

    rx.changed().await.unwrap();
    let committed = rx.borrow().clone();
    assert_eq!(committed.filters.search_query, "алг");
    assert_eq!(committed.pagination.page, 1);
}

#[tokio::test(start_paused = true)]
async fn invalid_edit_is_rejected_and_keeps_pending_commit() {
    let committer = FilterCommitter::new(ListParams::default(), DELAY);
    let pending = committer.edit(searching("фізика")).unwrap();

    let bad = FilterState {
        difficulty_range: ScoreRange(4.0, 2.0),
        ..FilterState::default()
    };
    let errors = committer.edit(bad).unwrap_err();
    assert!(errors.contains_key("difficulty_range"));

    assert!(pending.await.unwrap());
    assert_eq!(committer.current().filters.search_query, "фізика");
}

#[tokio::test(start_paused = true)]
async fn page_changes_are_immediate() {
    let committer = FilterCommitter::new(ListParams::default(), DELAY);
    committer.set_page(4);
    assert_eq!(committer.current().pagination.page, 4);
    committer.set_page(0);
    assert_eq!(committer.current().pagination.page, 1);
}

#[tokio::test(start_paused = true)]
async fn reset_cancels_pending_edit() {
    let committer = FilterCommitter::new(on_page(2), DELAY);
    let pending = committer.edit(searching("хімія")).unwrap();
    committer.reset();

    assert!(!pending.await.unwrap());
    let current = committer.current();
    assert!(current.filters.is_default());
    assert_eq!(current.pagination.page, 1);
    assert!(committer.draft().is_default());
}
