mod common;

use common::{World, translator_profile};
use time::Duration;
use time::macros::datetime;
use tolka::models::TranslatorAssignment;
use tolka::store::AssignmentStore;

#[tokio::test]
async fn fanout_skips_opted_out_translators() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let reachable = world.add_translator("reachable@example.com");

    let mut muted = translator_profile("muted@example.com");
    muted.not_get_notification = true;
    world.store.add_translator(muted);

    let job = world.seed_pending_job(customer.user_id, Duration::days(2)).await;
    let notified = world
        .coordinator
        .dispatcher()
        .notify_suitable_translators(&job, None)
        .await
        .unwrap();

    assert_eq!(notified, 1);
    let pushes = world.push.sent_pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].recipient_emails(), vec![reachable.email.clone()]);
}

#[tokio::test]
async fn emergency_opt_out_only_applies_to_immediate_jobs() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");

    let mut no_emergency = translator_profile("calm@example.com");
    no_emergency.not_get_emergency = true;
    world.store.add_translator(no_emergency);

    let scheduled = world.seed_pending_job(customer.user_id, Duration::days(2)).await;
    let notified = world
        .coordinator
        .dispatcher()
        .notify_suitable_translators(&scheduled, None)
        .await
        .unwrap();
    assert_eq!(notified, 1);

    let mut immediate = world
        .seed_pending_job(customer.user_id, Duration::minutes(5))
        .await;
    immediate.immediate = true;
    let notified = world
        .coordinator
        .dispatcher()
        .notify_suitable_translators(&immediate, None)
        .await
        .unwrap();
    assert_eq!(notified, 0);
}

#[tokio::test]
async fn double_booked_translators_are_not_fanned_out() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let busy = world.add_translator("busy@example.com");

    let held = world.seed_pending_job(customer.user_id, Duration::hours(48)).await;
    world
        .store
        .insert(TranslatorAssignment::new(
            held.id,
            busy.user_id,
            world.clock.now(),
        ))
        .await
        .unwrap();

    let clashing = world.seed_pending_job(customer.user_id, Duration::hours(48)).await;
    let notified = world
        .coordinator
        .dispatcher()
        .notify_suitable_translators(&clashing, None)
        .await
        .unwrap();
    assert_eq!(notified, 0);
    assert_eq!(world.push.sent_count(), 0);
}

#[tokio::test]
async fn night_time_pushes_are_delayed_for_opted_out_translators() {
    // 23:00 is inside the night window.
    let world = World::at(datetime!(2026-03-02 23:00 UTC));
    let customer = world.add_customer("customer@example.com");
    let night_owl = world.add_translator("owl@example.com");

    let mut sleeper = translator_profile("sleeper@example.com");
    sleeper.not_get_nighttime = true;
    world.store.add_translator(sleeper.clone());

    let job = world.seed_pending_job(customer.user_id, Duration::days(2)).await;
    let notified = world
        .coordinator
        .dispatcher()
        .notify_suitable_translators(&job, None)
        .await
        .unwrap();
    assert_eq!(notified, 2);

    let pushes = world.push.sent_pushes();
    assert_eq!(pushes.len(), 2);

    let immediate = pushes
        .iter()
        .find(|p| p.envelope.delay_until.is_none())
        .expect("night owls get the push right away");
    assert_eq!(immediate.recipient_emails(), vec![night_owl.email.clone()]);

    let delayed = pushes
        .iter()
        .find(|p| p.envelope.delay_until.is_some())
        .expect("sleepers get a delayed push");
    assert_eq!(delayed.recipient_emails(), vec![sleeper.email.clone()]);
    assert_eq!(
        delayed.envelope.delay_until,
        Some(datetime!(2026-03-03 09:00 UTC))
    );
}

#[tokio::test]
async fn daytime_pushes_are_never_delayed() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");

    let mut sleeper = translator_profile("sleeper@example.com");
    sleeper.not_get_nighttime = true;
    world.store.add_translator(sleeper);

    let job = world.seed_pending_job(customer.user_id, Duration::days(2)).await;
    world
        .coordinator
        .dispatcher()
        .notify_suitable_translators(&job, None)
        .await
        .unwrap();

    let pushes = world.push.sent_pushes();
    assert_eq!(pushes.len(), 1);
    assert!(pushes[0].envelope.delay_until.is_none());
}

#[tokio::test]
async fn sms_fanout_words_phone_and_physical_jobs_differently() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let translator = world.add_translator("translator@example.com");

    let phone_job = world.seed_pending_job(customer.user_id, Duration::days(2)).await;
    let count = world
        .coordinator
        .dispatcher()
        .sms_suitable_translators(&phone_job)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let mut physical_job = world
        .seed_pending_job(customer.user_id, Duration::days(3))
        .await;
    physical_job.customer_phone_type = false;
    physical_job.customer_physical_type = true;
    world
        .coordinator
        .dispatcher()
        .sms_suitable_translators(&physical_job)
        .await
        .unwrap();

    let batches = world.sms.sent_batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0][0].to, translator.mobile);
    assert!(batches[0][0].body.contains("telefontolkning"));
    assert!(batches[1][0].body.contains("platstolkning i Stockholm"));
}

#[tokio::test]
async fn empty_audience_sends_nothing() {
    let world = World::new();
    let customer = world.add_customer("customer@example.com");
    let job = world.seed_pending_job(customer.user_id, Duration::days(2)).await;

    let notified = world
        .coordinator
        .dispatcher()
        .notify_suitable_translators(&job, None)
        .await
        .unwrap();
    assert_eq!(notified, 0);
    assert_eq!(world.push.sent_count(), 0);
}
