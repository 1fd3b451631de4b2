mod common;

use common::{World, test_language};
use time::Duration;
use tolka::error::BookingError;
use tolka::models::{BookingRequest, JobStatus, JobType, NotificationType};
use tolka::services::coordinator::EndOutcome;
use tolka::store::{AssignmentStore, JobStore};
use tolka::utils::expiry::will_expire_at;

fn scheduled_request(due_in: Duration, now: time::OffsetDateTime) -> BookingRequest {
    BookingRequest {
        from_language_id: Some(test_language()),
        duration_minutes: Some(60),
        immediate: false,
        due: Some(now + due_in),
        customer_phone_type: Some(true),
        customer_physical_type: Some(false),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_validates_required_fields_in_order() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let now = world.clock.now();

    let assert_field = |err: BookingError, expected: &str| match err {
        BookingError::Validation { field } => assert_eq!(field, expected),
        other => panic!("expected Validation, got {other:?}"),
    };

    let mut request = scheduled_request(Duration::days(2), now);
    request.from_language_id = None;
    let err = world.coordinator.create(customer.user_id, &request).await.unwrap_err();
    assert_field(err, "from_language_id");

    let mut request = scheduled_request(Duration::days(2), now);
    request.duration_minutes = None;
    let err = world.coordinator.create(customer.user_id, &request).await.unwrap_err();
    assert_field(err, "duration");

    let mut request = scheduled_request(Duration::days(2), now);
    request.due = None;
    let err = world.coordinator.create(customer.user_id, &request).await.unwrap_err();
    assert_field(err, "due_date");

    let mut request = scheduled_request(Duration::days(2), now);
    request.customer_phone_type = Some(false);
    request.customer_physical_type = Some(false);
    let err = world.coordinator.create(customer.user_id, &request).await.unwrap_err();
    assert_field(err, "customer_phone_type");
}

#[tokio::test]
async fn create_rejects_past_due_times() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let now = world.clock.now();

    let mut request = scheduled_request(Duration::days(2), now);
    request.due = Some(now - Duration::hours(1));
    let err = world.coordinator.create(customer.user_id, &request).await.unwrap_err();
    match err {
        BookingError::BadRequest(message) => {
            assert_eq!(message, "Can't create booking in past");
        }
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn scheduled_booking_gets_the_expiry_band_and_job_type() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let now = world.clock.now();

    let job = world
        .coordinator
        .create(customer.user_id, &scheduled_request(Duration::days(5), now))
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Pending);
    // Paid consumer, paid job.
    assert_eq!(job.job_type, JobType::Paid);
    assert_eq!(job.will_expire_at, will_expire_at(job.due, now));
    // Town falls back to the customer's.
    assert_eq!(job.town.as_deref(), Some("Stockholm"));

    // Creation itself is silent; fan-out waits for the contact step.
    assert_eq!(world.push.sent_count(), 0);
    assert_eq!(world.mailer.sent_count(), 0);
}

#[tokio::test]
async fn immediate_booking_is_due_in_five_minutes_over_the_phone() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let now = world.clock.now();

    let request = BookingRequest {
        from_language_id: Some(test_language()),
        duration_minutes: Some(30),
        immediate: true,
        ..Default::default()
    };
    let job = world.coordinator.create(customer.user_id, &request).await.unwrap();

    assert!(job.immediate);
    assert_eq!(job.due, now + Duration::minutes(5));
    assert!(job.customer_phone_type);
}

#[tokio::test]
async fn contact_step_confirms_by_email_and_fans_out() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let translator = world.add_translator("translator@example.com");
    let now = world.clock.now();

    let job = world
        .coordinator
        .create(customer.user_id, &scheduled_request(Duration::days(2), now))
        .await
        .unwrap();

    let job = world
        .coordinator
        .store_job_email(
            job.id,
            Some("billing@example.com".to_string()),
            "PO-1234".to_string(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(job.reference, "PO-1234");

    // The booking-specific address wins over the account address.
    let email = world.mailer.last_sent().unwrap();
    assert_eq!(email.to, "billing@example.com");
    assert_eq!(
        email.subject,
        format!("Vi har mottagit er tolkbokning. Bokningsnr: #{}", job.id)
    );
    assert_eq!(email.template_key, "emails.job-created");

    let pushes = world.push.sent_pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].envelope.notification_type, NotificationType::SuitableJob);
    assert_eq!(pushes[0].recipient_emails(), vec![translator.email.clone()]);
    assert_eq!(
        pushes[0].envelope.message,
        "Ny bokning för franskatolk 60min"
    );
}

#[tokio::test]
async fn ending_a_started_session_settles_both_parties() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let translator = world.add_translator("translator@example.com");
    let job = world.seed_pending_job(customer.user_id, Duration::hours(30)).await;
    world.coordinator.accept(job.id, translator.user_id).await.unwrap();

    let mut started = world.store.find(job.id).await.unwrap().unwrap();
    started.status = JobStatus::Started;
    JobStore::save(&*world.store, &started).await.unwrap();
    world.mailer.clear();

    // Session ran 90 minutes past the due time.
    world.clock.set(started.due + Duration::minutes(90));
    let outcome = world
        .coordinator
        .end(job.id, customer.user_id)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        EndOutcome::Ended {
            session_time: "01:30:00".to_string(),
            other_party: Some(translator.user_id),
        }
    );

    let stored = world.store.find(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    assert_eq!(stored.session_time.as_deref(), Some("01:30:00"));

    let emails = world.mailer.sent_emails();
    assert_eq!(emails.len(), 2);
    assert_eq!(emails[0].to, "customer@example.com");
    assert_eq!(
        emails[0].subject,
        format!("Information om avslutad tolkning för bokningsnummer #{}", job.id)
    );
    assert_eq!(emails[1].to, "translator@example.com");
    assert_eq!(
        emails[1].subject,
        format!("Information om avslutad tolkning för bokningsnummer # {}", job.id)
    );

    let assignment = world
        .store
        .latest_completed_for_job(job.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assignment.completed_by, Some(customer.user_id));
}

#[tokio::test]
async fn ending_a_job_that_never_started_is_a_noop() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let job = world.seed_pending_job(customer.user_id, Duration::days(2)).await;

    let outcome = world.coordinator.end(job.id, customer.user_id).await.unwrap();
    assert_eq!(outcome, EndOutcome::NotStarted);

    let stored = world.store.find(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Pending);
    assert_eq!(world.mailer.sent_count(), 0);
}

#[tokio::test]
async fn no_show_settles_the_assignment_for_its_own_translator() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let translator = world.add_translator("translator@example.com");
    let job = world.seed_pending_job(customer.user_id, Duration::hours(30)).await;
    world.coordinator.accept(job.id, translator.user_id).await.unwrap();

    let job = world.coordinator.customer_not_call(job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::NotCarriedOutCustomer);
    assert_eq!(job.end_at, Some(world.clock.now()));

    let assignment = world
        .store
        .latest_completed_for_job(job.id)
        .await
        .unwrap()
        .unwrap();
    // Settled in the translator's favor: completed by the translator, not
    // by whoever reported the no-show.
    assert_eq!(assignment.completed_by, Some(translator.user_id));
}

#[tokio::test]
async fn no_show_without_an_assignment_still_closes_the_job() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let job = world.seed_pending_job(customer.user_id, Duration::hours(30)).await;

    let job = world.coordinator.customer_not_call(job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::NotCarriedOutCustomer);
}

#[tokio::test]
async fn reopening_a_timedout_booking_creates_a_new_job() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let translator = world.add_translator("translator@example.com");
    let job = world.seed_pending_job(customer.user_id, Duration::days(4)).await;

    let mut timedout = job.clone();
    timedout.status = JobStatus::Timedout;
    JobStore::save(&*world.store, &timedout).await.unwrap();

    let admin = uuid::Uuid::new_v4();
    let reopened = world.coordinator.reopen(job.id, admin).await.unwrap();

    // New row; the timedout original is untouched.
    assert_ne!(reopened.id, job.id);
    assert_eq!(reopened.status, JobStatus::Pending);
    assert_eq!(
        reopened.admin_comments,
        format!("This booking is a reopening of booking #{}", job.id)
    );
    let original = world.store.find(job.id).await.unwrap().unwrap();
    assert_eq!(original.status, JobStatus::Timedout);

    // The reopened job goes straight back out to translators.
    let pushes = world.push.sent_pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].envelope.job_id, reopened.id);
    assert_eq!(pushes[0].recipient_emails(), vec![translator.email.clone()]);
}

#[tokio::test]
async fn reopening_a_withdrawn_booking_resets_it_in_place() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let job = world.seed_pending_job(customer.user_id, Duration::days(4)).await;

    world.coordinator.cancel(job.id, customer.user_id).await.unwrap();
    let reopened = world
        .coordinator
        .reopen(job.id, customer.user_id)
        .await
        .unwrap();

    assert_eq!(reopened.id, job.id);
    assert_eq!(reopened.status, JobStatus::Pending);
    assert_eq!(reopened.withdraw_at, None);
    assert_eq!(reopened.created_at, world.clock.now());
}
