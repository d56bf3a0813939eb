//! Integration tests per il motore degli inviti

mod common;

#[cfg(test)]
mod invitation_tests {
    use super::common::*;
    use rendezvous::entities::{InvitationStatus, MembershipStatus};
    use rendezvous::services::{
        accept_invitation, add_member, get_members, get_my_invitations, invite_member,
        join_public_event, refuse_invitation,
    };
    use rendezvous::{ErrorKind, NotificationKind};
    use sqlx::SqlitePool;

    // ============================================================
    // invite_member
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_invite_to_public_event_success(pool: SqlitePool) {
        let state = create_test_state(pool);
        let mut carol_inbox = subscribe(&state, CAROL);

        // su un evento PUBLIC chiunque può invitare, non solo il creatore
        let outcome = invite_member(&state, BOB, JAZZ_PUBLIC, CAROL).await.unwrap();

        assert!(outcome.is_changed());
        let invitation = outcome.into_inner();
        assert_eq!(invitation.state, InvitationStatus::Pending);
        assert_eq!(invitation.inviter_id, BOB);
        assert_eq!(invitation.invited_id, CAROL);

        let notification = carol_inbox.try_recv().expect("invitee notified");
        assert_eq!(notification.kind, NotificationKind::Invited);
        assert_eq!(notification.event_id, JAZZ_PUBLIC);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_invite_missing_entities(pool: SqlitePool) {
        let state = create_test_state(pool);

        let err = invite_member(&state, ALICE, MISSING_EVENT, BOB).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = invite_member(&state, MISSING_USER, JAZZ_PUBLIC, BOB).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = invite_member(&state, ALICE, JAZZ_PUBLIC, ERIN_INACTIVE)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_invite_yourself_is_invalid(pool: SqlitePool) {
        let state = create_test_state(pool);

        let err = invite_member(&state, BOB, JAZZ_PUBLIC, BOB).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_invite_twice_is_informational(pool: SqlitePool) {
        let state = create_test_state(pool);

        let first = invite_member(&state, ALICE, JAZZ_PUBLIC, BOB).await.unwrap();
        let second = invite_member(&state, CAROL, JAZZ_PUBLIC, BOB).await.unwrap();

        assert!(!second.is_changed());
        assert_eq!(second.value().invite_id, first.value().invite_id);

        let pending = get_my_invitations(&state, BOB).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_invite_to_private_event_always_fails(pool: SqlitePool) {
        let state = create_test_state(pool);

        // nemmeno il creatore
        let err = invite_member(&state, ALICE, PARTY_PRIVATE, BOB).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);

        let err = invite_member(&state, CAROL, PARTY_PRIVATE, BOB).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_friends_only_event_creator_only(pool: SqlitePool) {
        let state = create_test_state(pool);

        let err = invite_member(&state, BOB, DINNER_FRIENDS_ONLY, CAROL)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);

        let outcome = invite_member(&state, ALICE, DINNER_FRIENDS_ONLY, CAROL)
            .await
            .unwrap();
        assert!(outcome.is_changed());
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_invite_to_full_event(pool: SqlitePool) {
        let state = create_test_state(pool);

        join_public_event(&state, TINY_PUBLIC_FULL_AT_ONE, ALICE)
            .await
            .unwrap();

        let err = invite_member(&state, BOB, TINY_PUBLIC_FULL_AT_ONE, CAROL)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_capacity_is_checked_before_users(pool: SqlitePool) {
        let state = create_test_state(pool);

        join_public_event(&state, TINY_PUBLIC_FULL_AT_ONE, ALICE)
            .await
            .unwrap();

        // evento pieno e inviter inesistente: vince il controllo di capienza
        let err = invite_member(&state, MISSING_USER, TINY_PUBLIC_FULL_AT_ONE, CAROL)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_refused_invitation_is_reopened(pool: SqlitePool) {
        let state = create_test_state(pool);

        let first = invite_member(&state, ALICE, JAZZ_PUBLIC, BOB)
            .await
            .unwrap()
            .into_inner();
        refuse_invitation(&state, BOB, first.invite_id).await.unwrap();

        let outcome = invite_member(&state, CAROL, JAZZ_PUBLIC, BOB).await.unwrap();
        assert!(outcome.is_changed());
        let reopened = outcome.into_inner();
        assert_eq!(reopened.invite_id, first.invite_id);
        assert_eq!(reopened.state, InvitationStatus::Pending);
        assert_eq!(reopened.inviter_id, CAROL);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_invite_after_acceptance_is_informational(pool: SqlitePool) {
        let state = create_test_state(pool);

        let invitation = invite_member(&state, ALICE, JAZZ_PUBLIC, BOB)
            .await
            .unwrap()
            .into_inner();
        accept_invitation(&state, BOB, invitation.invite_id).await.unwrap();

        let outcome = invite_member(&state, ALICE, JAZZ_PUBLIC, BOB).await.unwrap();
        assert!(!outcome.is_changed());
        assert_eq!(outcome.value().state, InvitationStatus::Accepted);
    }

    // ============================================================
    // get_my_invitations
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_get_my_invitations_is_enriched(pool: SqlitePool) {
        let state = create_test_state(pool);

        invite_member(&state, ALICE, JAZZ_PUBLIC, BOB).await.unwrap();
        invite_member(&state, ALICE, DINNER_FRIENDS_ONLY, BOB).await.unwrap();
        let refused = invite_member(&state, BOB, TINY_PUBLIC_FULL_AT_ONE, BOB).await;
        assert!(refused.is_err(), "self invitation must not be stored");

        let invitations = get_my_invitations(&state, BOB).await.unwrap();
        assert_eq!(invitations.len(), 2);
        for invitation in &invitations {
            assert_eq!(invitation.state, InvitationStatus::Pending);
            assert_eq!(invitation.inviter.as_ref().map(|u| u.id), Some(ALICE));
            assert!(invitation.event.is_some());
        }

        let err = get_my_invitations(&state, MISSING_USER).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // ============================================================
    // accept_invitation / refuse_invitation
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_accept_does_not_create_membership(pool: SqlitePool) {
        let state = create_test_state(pool);

        let invitation = invite_member(&state, ALICE, JAZZ_PUBLIC, BOB)
            .await
            .unwrap()
            .into_inner();
        let accepted = accept_invitation(&state, BOB, invitation.invite_id)
            .await
            .unwrap();
        assert_eq!(accepted.state, InvitationStatus::Accepted);

        let members = get_members(&state, JAZZ_PUBLIC).await.unwrap();
        assert_eq!(members.count, 0);

        // il chiamante completa il flusso con add_member
        let outcome = add_member(&state, JAZZ_PUBLIC, BOB).await.unwrap();
        assert!(outcome.is_changed());
        assert_eq!(outcome.value().status, MembershipStatus::Confirmed);
        assert!(get_my_invitations(&state, BOB).await.unwrap().is_empty());
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_accept_invitation_of_someone_else(pool: SqlitePool) {
        let state = create_test_state(pool);

        let invitation = invite_member(&state, ALICE, JAZZ_PUBLIC, BOB)
            .await
            .unwrap()
            .into_inner();

        let err = accept_invitation(&state, CAROL, invitation.invite_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_accept_missing_invitation(pool: SqlitePool) {
        let state = create_test_state(pool);

        let err = accept_invitation(&state, BOB, 12345).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = accept_invitation(&state, MISSING_USER, 1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "events")))]
    async fn test_answering_twice_is_conflict(pool: SqlitePool) {
        let state = create_test_state(pool);

        let invitation = invite_member(&state, ALICE, JAZZ_PUBLIC, BOB)
            .await
            .unwrap()
            .into_inner();
        refuse_invitation(&state, BOB, invitation.invite_id).await.unwrap();

        let err = accept_invitation(&state, BOB, invitation.invite_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }
}
