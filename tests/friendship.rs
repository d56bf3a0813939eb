//! Integration tests per il motore delle amicizie

mod common;

#[cfg(test)]
mod friendship_tests {
    use super::common::*;
    use rendezvous::ErrorKind;
    use rendezvous::entities::FriendshipStatus;
    use rendezvous::services::{
        create_friendship, find_all_friends, find_all_pending_requests, find_sent_requests,
        remove_friendship, unfriend, update_friendship,
    };
    use sqlx::SqlitePool;

    // ============================================================
    // create_friendship
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_friendship_success(pool: SqlitePool) {
        let state = create_test_state(pool);

        let friendship = create_friendship(&state, ALICE, BOB).await.unwrap();

        assert_eq!(friendship.status, FriendshipStatus::Pending);
        assert_eq!(friendship.sender_id, ALICE);
        assert_eq!(friendship.responder_id, BOB);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_friendship_with_missing_or_inactive_user(pool: SqlitePool) {
        let state = create_test_state(pool);

        let err = create_friendship(&state, ALICE, MISSING_USER).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = create_friendship(&state, ERIN_INACTIVE, ALICE).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_friendship_with_self(pool: SqlitePool) {
        let state = create_test_state(pool);

        let err = create_friendship(&state, ALICE, ALICE).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_create_friendship_twice_is_conflict(pool: SqlitePool) {
        let state = create_test_state(pool);

        create_friendship(&state, ALICE, BOB).await.unwrap();
        let err = create_friendship(&state, ALICE, BOB).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_crossed_requests_collapse_into_one_accepted_row(pool: SqlitePool) {
        let state = create_test_state(pool);

        let first = create_friendship(&state, ALICE, BOB).await.unwrap();
        let second = create_friendship(&state, BOB, ALICE).await.unwrap();

        assert_eq!(first.friendship_id, second.friendship_id);
        assert_eq!(second.status, FriendshipStatus::Accepted);

        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM friendships")
            .fetch_one(&state.pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let err = create_friendship(&state, ALICE, BOB).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_refused_friendship_can_be_requested_again(pool: SqlitePool) {
        let state = create_test_state(pool);

        create_friendship(&state, ALICE, BOB).await.unwrap();
        update_friendship(&state, ALICE, BOB, FriendshipStatus::Refused)
            .await
            .unwrap();

        // ora è bob a chiedere: l'orientamento della riga cambia
        let reopened = create_friendship(&state, BOB, ALICE).await.unwrap();
        assert_eq!(reopened.status, FriendshipStatus::Pending);
        assert_eq!(reopened.sender_id, BOB);
        assert_eq!(reopened.responder_id, ALICE);
    }

    // ============================================================
    // update_friendship
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_update_friendship_accept(pool: SqlitePool) {
        let state = create_test_state(pool);

        create_friendship(&state, ALICE, BOB).await.unwrap();
        let accepted = update_friendship(&state, ALICE, BOB, FriendshipStatus::Accepted)
            .await
            .unwrap();

        assert_eq!(accepted.status, FriendshipStatus::Accepted);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_update_friendship_missing_row(pool: SqlitePool) {
        let state = create_test_state(pool);

        let err = update_friendship(&state, ALICE, BOB, FriendshipStatus::Accepted)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_update_friendship_to_pending_is_invalid(pool: SqlitePool) {
        let state = create_test_state(pool);

        create_friendship(&state, ALICE, BOB).await.unwrap();
        let err = update_friendship(&state, ALICE, BOB, FriendshipStatus::Pending)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_only_the_responder_can_answer(pool: SqlitePool) {
        let state = create_test_state(pool);

        create_friendship(&state, ALICE, BOB).await.unwrap();

        // alice prova a rispondere alla propria richiesta
        let err = update_friendship(&state, BOB, ALICE, FriendshipStatus::Accepted)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_update_friendship_already_in_state_is_conflict(pool: SqlitePool) {
        let state = create_test_state(pool);

        create_friendship(&state, ALICE, BOB).await.unwrap();
        update_friendship(&state, ALICE, BOB, FriendshipStatus::Accepted)
            .await
            .unwrap();

        let err = update_friendship(&state, ALICE, BOB, FriendshipStatus::Accepted)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_accepted_friendship_cannot_be_refused(pool: SqlitePool) {
        let state = create_test_state(pool);

        create_friendship(&state, ALICE, BOB).await.unwrap();
        update_friendship(&state, ALICE, BOB, FriendshipStatus::Accepted)
            .await
            .unwrap();

        let err = update_friendship(&state, ALICE, BOB, FriendshipStatus::Refused)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    // ============================================================
    // remove_friendship / unfriend
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_sender_can_cancel_pending_request(pool: SqlitePool) {
        let state = create_test_state(pool);

        create_friendship(&state, ALICE, BOB).await.unwrap();
        remove_friendship(&state, ALICE, BOB).await.unwrap();

        assert!(find_all_pending_requests(&state, BOB).await.unwrap().is_empty());
        // la richiesta può essere rifatta da zero
        create_friendship(&state, ALICE, BOB).await.unwrap();
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_responder_cannot_cancel_request(pool: SqlitePool) {
        let state = create_test_state(pool);

        create_friendship(&state, ALICE, BOB).await.unwrap();
        let err = remove_friendship(&state, BOB, ALICE).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_unfriend_from_either_side(pool: SqlitePool) {
        let state = create_test_state(pool);

        create_friendship(&state, ALICE, BOB).await.unwrap();
        let err = unfriend(&state, BOB, ALICE).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "pending is not a friendship yet");

        update_friendship(&state, ALICE, BOB, FriendshipStatus::Accepted)
            .await
            .unwrap();
        unfriend(&state, BOB, ALICE).await.unwrap();

        assert!(find_all_friends(&state, ALICE).await.unwrap().is_empty());
    }

    // ============================================================
    // liste
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_find_all_friends_returns_the_other_side(pool: SqlitePool) {
        let state = create_test_state(pool);

        create_friendship(&state, ALICE, BOB).await.unwrap();
        update_friendship(&state, ALICE, BOB, FriendshipStatus::Accepted)
            .await
            .unwrap();
        create_friendship(&state, CAROL, ALICE).await.unwrap();
        update_friendship(&state, CAROL, ALICE, FriendshipStatus::Accepted)
            .await
            .unwrap();
        // ancora pending: non è un amico
        create_friendship(&state, ALICE, DAVE).await.unwrap();

        let friends = find_all_friends(&state, ALICE).await.unwrap();
        let mut names: Vec<&str> = friends.iter().map(|f| f.friend.username.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["bob", "carol"]);

        let bob_friends = find_all_friends(&state, BOB).await.unwrap();
        assert_eq!(bob_friends.len(), 1);
        assert_eq!(bob_friends[0].friend.id, ALICE);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_pending_lists_are_split_by_direction(pool: SqlitePool) {
        let state = create_test_state(pool);

        create_friendship(&state, ALICE, BOB).await.unwrap();
        create_friendship(&state, CAROL, BOB).await.unwrap();
        create_friendship(&state, BOB, DAVE).await.unwrap();

        let incoming = find_all_pending_requests(&state, BOB).await.unwrap();
        let mut senders: Vec<i32> = incoming.iter().map(|r| r.user.id).collect();
        senders.sort();
        assert_eq!(senders, vec![ALICE, CAROL]);

        let outgoing = find_sent_requests(&state, BOB).await.unwrap();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].user.id, DAVE);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_lists_for_missing_user(pool: SqlitePool) {
        let state = create_test_state(pool);

        let err = find_all_friends(&state, MISSING_USER).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
