//! Waitlist membership, promotion on cancellation, and the manual
//! promotion path.

mod common;

use kernel::model::id::SessionId;
use kernel::model::reservation::event::{CancelReservation, ReserveClass};
use kernel::model::reservation::ReservationStatus;
use kernel::model::waitlist::event::JoinWaitlist;
use shared::error::AppError;

use common::{app, app_with_broken_promotions, member, session_in_hours};

#[tokio::test]
async fn joining_requires_a_full_session() -> anyhow::Result<()> {
    let app = app();
    let ada = member("Ada", 30);
    let ben = member("Ben", 10);
    let session = session_in_hours(3, 2);
    app.store.add_member(ada.clone()).await;
    app.store.add_member(ben.clone()).await;
    app.store.add_session(session.clone()).await;

    app.booking
        .create_reservation(ReserveClass::new(ada.member_id, session.session_id))
        .await?;

    // One of two seats taken; the waitlist stays closed.
    let err = app
        .waitlist
        .join(JoinWaitlist::new(ben.member_id, session.session_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SessionNotFull(_)));
    Ok(())
}

#[tokio::test]
async fn joining_a_full_session_records_the_server_priority() -> anyhow::Result<()> {
    let app = app();
    let ada = member("Ada", 30);
    let ben = member("Ben", 100);
    let session = session_in_hours(3, 1);
    app.store.add_member(ada.clone()).await;
    app.store.add_member(ben.clone()).await;
    app.store.add_session(session.clone()).await;

    app.booking
        .create_reservation(ReserveClass::new(ada.member_id, session.session_id))
        .await?;

    let entry = app
        .waitlist
        .join(JoinWaitlist::new(ben.member_id, session.session_id))
        .await?;
    assert_eq!(entry.session_id, session.session_id);
    assert_eq!(entry.member_id, ben.member_id);
    // 100 days of tenure, no booking history.
    assert_eq!(entry.priority, 100);
    assert_eq!(entry.registered_at, app.now);
    assert!(!entry.notified);
    Ok(())
}

#[tokio::test]
async fn joining_twice_is_a_duplicate() -> anyhow::Result<()> {
    let app = app();
    let ada = member("Ada", 30);
    let ben = member("Ben", 10);
    let session = session_in_hours(3, 1);
    app.store.add_member(ada.clone()).await;
    app.store.add_member(ben.clone()).await;
    app.store.add_session(session.clone()).await;

    app.booking
        .create_reservation(ReserveClass::new(ada.member_id, session.session_id))
        .await?;
    app.waitlist
        .join(JoinWaitlist::new(ben.member_id, session.session_id))
        .await?;

    let err = app
        .waitlist
        .join(JoinWaitlist::new(ben.member_id, session.session_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateEntry(_)));
    Ok(())
}

#[tokio::test]
async fn joining_needs_an_existing_session_and_member() {
    let app = app();
    let ada = member("Ada", 30);

    let err = app
        .waitlist
        .join(JoinWaitlist::new(ada.member_id, SessionId::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EntityNotFound(_)));

    // Session exists, member does not.
    let session = session_in_hours(3, 1);
    app.store.add_session(session.clone()).await;
    let err = app
        .waitlist
        .join(JoinWaitlist::new(ada.member_id, session.session_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EntityNotFound(_)));
}

#[tokio::test]
async fn cancellation_promotes_the_best_candidate() -> anyhow::Result<()> {
    let app = app();
    let ada = member("Ada", 30);
    let strong = member("Ben", 100);
    let weak = member("Cleo", 10);
    let session = session_in_hours(3, 1);
    for m in [&ada, &strong, &weak] {
        app.store.add_member(m.clone()).await;
    }
    app.store.add_session(session.clone()).await;

    let reservation = app
        .booking
        .create_reservation(ReserveClass::new(ada.member_id, session.session_id))
        .await?;
    app.waitlist
        .join(JoinWaitlist::new(weak.member_id, session.session_id))
        .await?;
    app.waitlist
        .join(JoinWaitlist::new(strong.member_id, session.session_id))
        .await?;

    app.booking
        .cancel_reservation(CancelReservation::new(
            reservation.reservation_id,
            ada.member_id,
        ))
        .await?;

    let bookings = app.booking.reservations_for_member(strong.member_id).await?;
    assert_eq!(bookings.len(), 1);
    let promoted = &bookings[0].reservation;
    assert_eq!(promoted.session_id, session.session_id);
    assert_eq!(promoted.status, ReservationStatus::Confirmed);
    // The promoted seat keeps the priority frozen at join time.
    assert_eq!(promoted.priority, 100);

    let entries = app.store.waitlist_entries(session.session_id).await;
    let ben_entry = entries
        .iter()
        .find(|e| e.member_id == strong.member_id)
        .unwrap();
    let cleo_entry = entries
        .iter()
        .find(|e| e.member_id == weak.member_id)
        .unwrap();
    assert!(ben_entry.notified);
    assert!(!cleo_entry.notified, "the weaker candidate keeps waiting");

    assert_eq!(
        app.notifier.promotions().await,
        vec![(strong.member_id, session.session_id)]
    );

    let snapshot = app.availability.snapshot(session.session_id).await?;
    assert!(snapshot.is_full, "the freed seat is taken again");
    Ok(())
}

#[tokio::test]
async fn successive_cancellations_drain_the_list_in_priority_order() -> anyhow::Result<()> {
    let app = app();
    let ada = member("Ada", 30);
    let ben = member("Ben", 20);
    let mid = member("Cleo", 60);
    let top = member("Dara", 90);
    let session = session_in_hours(3, 2);
    for m in [&ada, &ben, &mid, &top] {
        app.store.add_member(m.clone()).await;
    }
    app.store.add_session(session.clone()).await;

    let first = app
        .booking
        .create_reservation(ReserveClass::new(ada.member_id, session.session_id))
        .await?;
    let second = app
        .booking
        .create_reservation(ReserveClass::new(ben.member_id, session.session_id))
        .await?;
    app.waitlist
        .join(JoinWaitlist::new(mid.member_id, session.session_id))
        .await?;
    app.waitlist
        .join(JoinWaitlist::new(top.member_id, session.session_id))
        .await?;

    app.booking
        .cancel_reservation(CancelReservation::new(first.reservation_id, ada.member_id))
        .await?;
    app.booking
        .cancel_reservation(CancelReservation::new(second.reservation_id, ben.member_id))
        .await?;

    assert_eq!(
        app.notifier.promotions().await,
        vec![
            (top.member_id, session.session_id),
            (mid.member_id, session.session_id),
        ]
    );
    let entries = app.store.waitlist_entries(session.session_id).await;
    assert!(entries.iter().all(|e| e.notified), "nobody is left waiting");
    Ok(())
}

#[tokio::test]
async fn promotion_is_a_no_op_without_seats_or_candidates() -> anyhow::Result<()> {
    let app = app();
    let ada = member("Ada", 30);
    let ben = member("Ben", 10);
    app.store.add_member(ada.clone()).await;
    app.store.add_member(ben.clone()).await;

    // Free seats but an empty list.
    let open = session_in_hours(3, 5);
    app.store.add_session(open.clone()).await;
    assert!(app.waitlist.promote_next(open.session_id).await?.is_none());

    // A candidate but no free seat.
    let full = session_in_hours(4, 1);
    app.store.add_session(full.clone()).await;
    app.booking
        .create_reservation(ReserveClass::new(ada.member_id, full.session_id))
        .await?;
    app.waitlist
        .join(JoinWaitlist::new(ben.member_id, full.session_id))
        .await?;
    assert!(app.waitlist.promote_next(full.session_id).await?.is_none());

    let err = app.waitlist.promote_next(SessionId::new()).await.unwrap_err();
    assert!(matches!(err, AppError::EntityNotFound(_)));
    Ok(())
}

#[tokio::test]
async fn a_capacity_raise_can_be_back_filled_manually() -> anyhow::Result<()> {
    let app = app();
    let ada = member("Ada", 30);
    let ben = member("Ben", 50);
    let session = session_in_hours(3, 1);
    app.store.add_member(ada.clone()).await;
    app.store.add_member(ben.clone()).await;
    app.store.add_session(session.clone()).await;

    app.booking
        .create_reservation(ReserveClass::new(ada.member_id, session.session_id))
        .await?;
    let entry = app
        .waitlist
        .join(JoinWaitlist::new(ben.member_id, session.session_id))
        .await?;

    // Ops bumped the capacity; the freed seat is filled on demand.
    let mut enlarged = session.clone();
    enlarged.capacity = 2;
    app.store.add_session(enlarged).await;

    let promoted = app
        .waitlist
        .promote_next(session.session_id)
        .await?
        .expect("one seat is free and one member is waiting");
    assert_eq!(promoted.member_id, ben.member_id);
    assert_eq!(promoted.priority, entry.priority);
    assert_eq!(
        app.notifier.promotions().await,
        vec![(ben.member_id, session.session_id)]
    );
    Ok(())
}

#[tokio::test]
async fn a_failed_promotion_never_unwinds_the_cancellation() -> anyhow::Result<()> {
    let app = app_with_broken_promotions();
    let ada = member("Ada", 30);
    let ben = member("Ben", 50);
    let session = session_in_hours(3, 1);
    app.store.add_member(ada.clone()).await;
    app.store.add_member(ben.clone()).await;
    app.store.add_session(session.clone()).await;

    let reservation = app
        .booking
        .create_reservation(ReserveClass::new(ada.member_id, session.session_id))
        .await?;
    app.waitlist
        .join(JoinWaitlist::new(ben.member_id, session.session_id))
        .await?;

    // The promotion behind this cancel fails; the cancel must not.
    app.booking
        .cancel_reservation(CancelReservation::new(
            reservation.reservation_id,
            ada.member_id,
        ))
        .await?;

    let stored = app
        .store
        .reservation(reservation.reservation_id)
        .await
        .unwrap();
    assert_eq!(stored.status, ReservationStatus::Cancelled);

    let entries = app.store.waitlist_entries(session.session_id).await;
    assert!(
        !entries[0].notified,
        "the entry survives for the next promotion attempt"
    );
    assert!(app
        .booking
        .reservations_for_member(ben.member_id)
        .await?
        .is_empty());
    assert!(app.notifier.promotions().await.is_empty());
    Ok(())
}
