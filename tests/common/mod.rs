#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use serde_json::Value;
use time::OffsetDateTime;
use time::macros::datetime;
use tolka::models::{
    ConsumerType, CustomerProfile, Job, JobStatus, JobType, NotificationEnvelope,
    TranslatorProfile, TranslatorType,
};
use tolka::services::clock::Clock;
use tolka::services::coordinator::AssignmentCoordinator;
use tolka::services::localization::SvCatalog;
use tolka::services::transport::{
    EmailTemplate, Mailer, PushTransport, SmsDeliveryStatus, SmsMessage, SmsTransport,
    TransportError,
};
use tolka::store::MemoryStore;
use tolka::utils::expiry::will_expire_at;
use uuid::Uuid;

pub fn init_tracing_once() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("tolka=debug")
            .with_test_writer()
            .init();
    });
}

/// Language id every test fixture books; mapped to "franska" in the catalog.
pub fn test_language() -> Uuid {
    Uuid::from_u128(0xF2A)
}

/// Test clock with a settable instant.
pub struct FixedClock {
    now: Mutex<OffsetDateTime>,
}

impl FixedClock {
    pub fn at(now: OffsetDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Inherent so tests can read the clock without importing the trait.
    pub fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap()
    }

    pub fn set(&self, now: OffsetDateTime) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: time::Duration) {
        let mut guard = self.now.lock().unwrap();
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        FixedClock::now(self)
    }
}

/// A mock mailer that stores sent emails for testing verification.
#[derive(Default)]
pub struct MockMailer {
    sent: Mutex<Vec<SentEmail>>,
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub template_key: &'static str,
}

impl MockMailer {
    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_sent(&self) -> Option<SentEmail> {
        self.sent.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(
        &self,
        to: &str,
        _name: &str,
        subject: &str,
        template: &EmailTemplate,
        _job: &Job,
    ) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            template_key: template.key(),
        });
        Ok(())
    }
}

/// A mock push transport that records every envelope with its recipients.
#[derive(Default)]
pub struct MockPush {
    sent: Mutex<Vec<SentPush>>,
}

#[derive(Debug, Clone)]
pub struct SentPush {
    pub recipients: Value,
    pub envelope: NotificationEnvelope,
}

impl SentPush {
    /// Emails mentioned in the recipient tag expression.
    pub fn recipient_emails(&self) -> Vec<String> {
        self.recipients
            .as_array()
            .map(|tags| {
                tags.iter()
                    .filter_map(|tag| tag["value"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl MockPush {
    pub fn sent_pushes(&self) -> Vec<SentPush> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl PushTransport for MockPush {
    async fn send(
        &self,
        recipients: &Value,
        envelope: &NotificationEnvelope,
    ) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(SentPush {
            recipients: recipients.clone(),
            envelope: envelope.clone(),
        });
        Ok(())
    }
}

/// A mock SMS transport that records each batch.
#[derive(Default)]
pub struct MockSms {
    batches: Mutex<Vec<Vec<SmsMessage>>>,
}

impl MockSms {
    pub fn sent_batches(&self) -> Vec<Vec<SmsMessage>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsTransport for MockSms {
    async fn send_batch(
        &self,
        messages: &[SmsMessage],
    ) -> Result<SmsDeliveryStatus, TransportError> {
        self.batches.lock().unwrap().push(messages.to_vec());
        Ok(SmsDeliveryStatus {
            accepted: messages.len(),
        })
    }
}

/// Everything a coordinator test needs: the store, the recording
/// transports, a settable clock and the coordinator wired over them.
pub struct World {
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<MockMailer>,
    pub push: Arc<MockPush>,
    pub sms: Arc<MockSms>,
    pub clock: Arc<FixedClock>,
    pub coordinator: AssignmentCoordinator,
}

/// Daytime instant all tests start from, safely outside the night window.
pub fn default_now() -> OffsetDateTime {
    datetime!(2026-03-02 10:00 UTC)
}

impl World {
    pub fn new() -> Self {
        Self::at(default_now())
    }

    pub fn at(now: OffsetDateTime) -> Self {
        init_tracing_once();

        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(MockMailer::default());
        let push = Arc::new(MockPush::default());
        let sms = Arc::new(MockSms::default());
        let clock = Arc::new(FixedClock::at(now));
        let localizer = Arc::new(SvCatalog::new(HashMap::from([(
            test_language(),
            "franska".to_string(),
        )])));

        let coordinator = AssignmentCoordinator::new(
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            Arc::clone(&mailer) as _,
            Arc::clone(&push) as _,
            Arc::clone(&sms) as _,
            localizer,
            Arc::clone(&clock) as _,
        );

        Self {
            store,
            mailer,
            push,
            sms,
            clock,
            coordinator,
        }
    }

    pub fn add_customer(&self, email: &str) -> CustomerProfile {
        let customer = customer_profile(email);
        self.store.add_customer(customer.clone());
        customer
    }

    pub fn add_translator(&self, email: &str) -> TranslatorProfile {
        let translator = translator_profile(email);
        self.store.add_translator(translator.clone());
        translator
    }

    /// Seeds a pending job directly into the store, bypassing the create
    /// validations, due at `now + due_in`.
    pub async fn seed_pending_job(&self, customer_id: Uuid, due_in: time::Duration) -> Job {
        let now = self.clock.now();
        let job = pending_job(customer_id, now + due_in, now);
        tolka::store::JobStore::insert(&*self.store, job.clone())
            .await
            .unwrap();
        job
    }
}

pub fn customer_profile(email: &str) -> CustomerProfile {
    CustomerProfile {
        user_id: Uuid::new_v4(),
        name: format!("Customer {email}"),
        email: email.to_string(),
        mobile: None,
        town: Some("Stockholm".to_string()),
        consumer_type: ConsumerType::Paid,
        not_get_notification: false,
        not_get_nighttime: false,
    }
}

pub fn translator_profile(email: &str) -> TranslatorProfile {
    TranslatorProfile {
        user_id: Uuid::new_v4(),
        name: format!("Translator {email}"),
        email: email.to_string(),
        mobile: "+46700000000".to_string(),
        translator_type: TranslatorType::Professional,
        certifications: vec![tolka::models::CertificationLevel::Layman],
        gender: tolka::models::Gender::Female,
        languages: HashSet::from([test_language()]),
        town: Some("Stockholm".to_string()),
        not_get_notification: false,
        not_get_emergency: false,
        not_get_nighttime: false,
    }
}

pub fn pending_job(customer_id: Uuid, due: OffsetDateTime, created_at: OffsetDateTime) -> Job {
    Job {
        id: Uuid::new_v4(),
        customer_id,
        status: JobStatus::Pending,
        from_language_id: test_language(),
        immediate: false,
        duration_minutes: 60,
        due,
        gender: None,
        certified: None,
        job_type: JobType::Paid,
        customer_phone_type: true,
        customer_physical_type: false,
        town: Some("Stockholm".to_string()),
        customer_email: None,
        reference: String::new(),
        admin_comments: String::new(),
        created_at,
        will_expire_at: will_expire_at(due, created_at),
        withdraw_at: None,
        end_at: None,
        session_time: None,
        by_admin: false,
        cust_16h_email_sent: false,
        cust_48h_email_sent: false,
    }
}
