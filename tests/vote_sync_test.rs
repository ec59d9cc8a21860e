mod support;

use std::sync::Arc;
use std::time::Duration;

use coursescope::models::VoteType;
use coursescope::votes::{VOTE_DEBOUNCE, VoteRegistry, VoteState, VoteSync};

use support::{FakeApi, Failure, rating};

fn sync_for(api: &Arc<FakeApi>, upvotes: u32, downvotes: u32, viewer_vote: Option<VoteType>) -> VoteSync {
    let r = rating(upvotes, downvotes, viewer_vote);
    VoteSync::new(r.id, VoteState::from_rating(&r), api.clone(), VOTE_DEBOUNCE)
}

#[tokio::test(start_paused = true)]
async fn burst_of_clicks_sends_only_the_final_state() {
    let api = Arc::new(FakeApi::new());
    let sync = sync_for(&api, 3, 1, None);

    let (after_up, _) = sync.select(Some(VoteType::Upvote));
    assert_eq!((after_up.upvotes, after_up.downvotes), (4, 1));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (after_down, _) = sync.select(Some(VoteType::Downvote));
    assert_eq!((after_down.upvotes, after_down.downvotes), (3, 2));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (cleared, last) = sync.select(None);
    assert_eq!((cleared.upvotes, cleared.downvotes), (3, 1));
    assert!(cleared.pending);

    assert!(last.await.unwrap());
    let calls = api.calls();
    assert_eq!(calls, vec![format!("delete_vote {}", sync.rating_id())]);

    let state = sync.state();
    assert!(!state.pending);
    assert_eq!(state.confirmed, None);
}

#[tokio::test(start_paused = true)]
async fn nothing_is_sent_before_the_quiet_period() {
    let api = Arc::new(FakeApi::new());
    let sync = sync_for(&api, 0, 0, None);

    sync.select(Some(VoteType::Upvote));
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(api.calls().is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(api.calls_starting_with("upsert_vote").len(), 1);
    assert_eq!(sync.state().confirmed, Some(VoteType::Upvote));
}

#[tokio::test(start_paused = true)]
async fn failed_write_reverts_to_confirmed_vote() {
    let api = Arc::new(FakeApi::new());
    api.fail_votes_with(Some(Failure::Server));
    let sync = sync_for(&api, 5, 2, Some(VoteType::Upvote));

    let (optimistic, handle) = sync.select(Some(VoteType::Downvote));
    assert_eq!(optimistic.selected, Some(VoteType::Downvote));
    assert_eq!((optimistic.upvotes, optimistic.downvotes), (4, 3));

    assert!(handle.await.unwrap());
    let state = sync.state();
    assert_eq!(state.selected, Some(VoteType::Upvote));
    assert_eq!(state.confirmed, Some(VoteType::Upvote));
    assert_eq!((state.upvotes, state.downvotes), (5, 2));
    assert!(!state.pending);
}

#[tokio::test(start_paused = true)]
async fn registry_keeps_local_state_across_refetches() {
    let api = Arc::new(FakeApi::new());
    let registry = VoteRegistry::new(api.clone(), VOTE_DEBOUNCE);
    let r = rating(1, 0, None);

    let sync = registry.track(&r);
    sync.select(Some(VoteType::Upvote));

    // a refetch of the same rating must not clobber the optimistic state
    let again = registry.track(&r);
    assert!(Arc::ptr_eq(&sync, &again));
    assert_eq!(again.state().selected, Some(VoteType::Upvote));
    assert!(registry.get(r.id).is_some());
    assert!(registry.get(uuid::Uuid::new_v4()).is_none());
}

#[tokio::test(start_paused = true)]
async fn failed_write_does_not_revert_a_newer_identical_click() {
    let api = Arc::new(FakeApi::new());
    api.fail_votes_with(Some(Failure::Server));
    api.slow_votes_by(Duration::from_secs(1));
    let sync = sync_for(&api, 0, 0, None);

    let (_, first) = sync.select(Some(VoteType::Upvote));
    // first write is now waiting on the API
    tokio::time::sleep(Duration::from_millis(600)).await;

    let (_, cleared) = sync.select(None);
    let (_, last) = sync.select(Some(VoteType::Upvote));

    assert!(first.await.unwrap());
    let state = sync.state();
    assert_eq!(state.selected, Some(VoteType::Upvote));
    assert_eq!(state.upvotes, 1);
    assert!(state.pending);

    assert!(!cleared.await.unwrap());
    assert!(last.await.unwrap());
    let state = sync.state();
    assert_eq!(state.selected, None);
    assert_eq!(state.upvotes, 0);
    assert!(!state.pending);
}

#[tokio::test(start_paused = true)]
async fn refetch_without_pending_vote_takes_server_counts() {
    let api = Arc::new(FakeApi::new());
    let registry = VoteRegistry::new(api.clone(), VOTE_DEBOUNCE);
    let mut r = rating(1, 0, None);
    registry.track(&r);

    r.upvotes = 9;
    r.downvotes = 4;
    r.viewer_vote = Some(VoteType::Downvote);
    let state = registry.track(&r).state();

    assert_eq!((state.upvotes, state.downvotes), (9, 4));
    assert_eq!(state.selected, Some(VoteType::Downvote));
    assert_eq!(state.confirmed, Some(VoteType::Downvote));
    assert!(!state.pending);
}

#[tokio::test(start_paused = true)]
async fn registry_drops_least_recently_seen_idle_ratings() {
    let api = Arc::new(FakeApi::new());
    let registry = VoteRegistry::with_capacity(api.clone(), VOTE_DEBOUNCE, 2);
    let (a, b, c) = (rating(0, 0, None), rating(0, 0, None), rating(0, 0, None));

    registry.track(&a).select(Some(VoteType::Upvote));
    registry.track(&b);
    registry.track(&c);

    assert_eq!(registry.len(), 2);
    // `a` is older but has a write pending
    assert!(registry.get(a.id).is_some());
    assert!(registry.get(b.id).is_none());
    assert!(registry.get(c.id).is_some());
}
