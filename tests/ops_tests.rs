use std::cell::RefCell;

use crm::access::{AllowAll, Permission, RequestContext, StaticPermissions};
use crm::db::*;
use crm::error::CrmError;
use crm::model::*;
use crm::notify::{MessageDescriptor, Notifier, NotifyError, NoopNotifier};
use crm::ops::*;

static ALLOW: AllowAll = AllowAll;

fn setup() -> (rusqlite::Connection, User) {
    let conn = schema::test_connection();
    let actor = User::create("Tobias".into(), "McNulty".into(), "tobias@example.com".into());
    user_repo::insert(&conn, &actor).unwrap();
    (conn, actor)
}

fn ctx(actor: &User) -> RequestContext<'static> {
    RequestContext::new(actor.id, &ALLOW)
}

fn person_request(first: &str, last: &str, email: &str) -> person_ops::PersonSaveRequest {
    person_ops::PersonSaveRequest {
        person: person_ops::PersonFields {
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
        },
        ..Default::default()
    }
}

fn count(conn: &rusqlite::Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

struct RecordingNotifier {
    sent: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, _descriptor: &MessageDescriptor, recipient: &str) -> Result<(), NotifyError> {
        self.sent.borrow_mut().push(recipient.to_string());
        Ok(())
    }
}

struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&self, _descriptor: &MessageDescriptor, _recipient: &str) -> Result<(), NotifyError> {
        Err(NotifyError("smtp connection refused".into()))
    }
}

// ==========================================================================
// COMPOSITE PERSON SAVE
// ==========================================================================

#[test]
fn save_person_creates_user_and_profile() {
    let (mut conn, actor) = setup();
    let record = person_ops::save_person(
        &mut conn,
        &ctx(&actor),
        person_request("John", "Smith", "john@example.com"),
        &NoopNotifier,
    )
    .unwrap()
    .saved()
    .unwrap();

    assert!(record.created);
    assert_eq!(record.user.full_name(), "John Smith");
    let stored = profile_repo::find_by_user(&conn, record.user.id).unwrap();
    assert!(stored.is_some());
}

#[test]
fn save_person_trims_fields() {
    let (mut conn, actor) = setup();
    let record = person_ops::save_person(
        &mut conn,
        &ctx(&actor),
        person_request("  John ", " Smith ", " john@example.com "),
        &NoopNotifier,
    )
    .unwrap()
    .saved()
    .unwrap();

    assert_eq!(record.user.first_name, "John");
    assert_eq!(record.user.email, "john@example.com");
}

#[test]
fn save_person_rejects_blank_name() {
    let (mut conn, actor) = setup();
    let errors = person_ops::save_person(
        &mut conn,
        &ctx(&actor),
        person_request("   ", "Smith", "john@example.com"),
        &NoopNotifier,
    )
    .unwrap()
    .invalid()
    .unwrap();

    assert!(!errors.messages("first_name").is_empty());
}

#[test]
fn save_person_rejects_malformed_email() {
    let (mut conn, actor) = setup();
    let errors = person_ops::save_person(
        &mut conn,
        &ctx(&actor),
        person_request("John", "Smith", "not-an-email"),
        &NoopNotifier,
    )
    .unwrap()
    .invalid()
    .unwrap();

    assert!(!errors.messages("email").is_empty());
}

#[test]
fn save_person_rejects_taken_email_on_insert() {
    let (mut conn, actor) = setup();
    // The actor already holds this address, case differences aside.
    let errors = person_ops::save_person(
        &mut conn,
        &ctx(&actor),
        person_request("John", "Smith", "TOBIAS@example.com"),
        &NoopNotifier,
    )
    .unwrap()
    .invalid()
    .unwrap();

    assert!(!errors.messages("email").is_empty());
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM users"), 1);
}

#[test]
fn save_person_keeps_own_email_on_edit() {
    let (mut conn, actor) = setup();
    let record = person_ops::save_person(
        &mut conn,
        &ctx(&actor),
        person_request("John", "Smith", "john@example.com"),
        &NoopNotifier,
    )
    .unwrap()
    .saved()
    .unwrap();

    let mut request = person_request("Johnny", "Smith", "john@example.com");
    request.profile_id = Some(record.profile.id);
    let updated = person_ops::save_person(&mut conn, &ctx(&actor), request, &NoopNotifier)
        .unwrap()
        .saved()
        .unwrap();

    assert!(!updated.created);
    assert_eq!(updated.user.first_name, "Johnny");
}

#[test]
fn save_person_stores_phones_one_per_type() {
    let (mut conn, actor) = setup();
    let mut request = person_request("John", "Smith", "john@example.com");
    request.phones = vec![
        (PhoneType::Home, "919-555-0100".into()),
        (PhoneType::Work, "919-555-0101".into()),
    ];
    let record = person_ops::save_person(&mut conn, &ctx(&actor), request, &NoopNotifier)
        .unwrap()
        .saved()
        .unwrap();

    assert_eq!(record.phones.len(), 2);
    let home = profile_repo::find_phone(&conn, record.profile.id, PhoneType::Home)
        .unwrap()
        .unwrap();
    assert_eq!(home.number, "919-555-0100");
}

#[test]
fn save_person_replaces_phone_number_on_edit() {
    let (mut conn, actor) = setup();
    let mut request = person_request("John", "Smith", "john@example.com");
    request.phones = vec![(PhoneType::Home, "919-555-0100".into())];
    let record = person_ops::save_person(&mut conn, &ctx(&actor), request, &NoopNotifier)
        .unwrap()
        .saved()
        .unwrap();

    let mut edit = person_request("John", "Smith", "john@example.com");
    edit.profile_id = Some(record.profile.id);
    edit.phones = vec![(PhoneType::Home, "919-555-0199".into())];
    person_ops::save_person(&mut conn, &ctx(&actor), edit, &NoopNotifier)
        .unwrap()
        .saved()
        .unwrap();

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM phones"), 1);
    let home = profile_repo::find_phone(&conn, record.profile.id, PhoneType::Home)
        .unwrap()
        .unwrap();
    assert_eq!(home.number, "919-555-0199");
}

#[test]
fn blank_phone_number_deletes_stored_slot() {
    let (mut conn, actor) = setup();
    let mut request = person_request("John", "Smith", "john@example.com");
    request.phones = vec![(PhoneType::Home, "919-555-0100".into())];
    let record = person_ops::save_person(&mut conn, &ctx(&actor), request, &NoopNotifier)
        .unwrap()
        .saved()
        .unwrap();

    let mut edit = person_request("John", "Smith", "john@example.com");
    edit.profile_id = Some(record.profile.id);
    edit.phones = vec![(PhoneType::Home, "   ".into())];
    person_ops::save_person(&mut conn, &ctx(&actor), edit, &NoopNotifier)
        .unwrap()
        .saved()
        .unwrap();

    let home = profile_repo::find_phone(&conn, record.profile.id, PhoneType::Home).unwrap();
    assert!(home.is_none());
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM phones"), 0);
}

#[test]
fn invalid_phone_blocks_every_write() {
    let (mut conn, actor) = setup();
    let mut request = person_request("John", "Smith", "john@example.com");
    request.phones = vec![(PhoneType::Home, "no digits here".into())];
    let errors = person_ops::save_person(&mut conn, &ctx(&actor), request, &NoopNotifier)
        .unwrap()
        .invalid()
        .unwrap();

    assert!(!errors.messages("home").is_empty());
    // Only the actor from setup remains; nothing was persisted.
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM users"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM profiles"), 0);
}

#[test]
fn persistence_failure_rolls_back_whole_save() {
    let (mut conn, actor) = setup();
    // Sabotage the last step of the composite save.
    conn.execute("DROP TABLE phones", []).unwrap();

    let mut request = person_request("John", "Smith", "john@example.com");
    request.phones = vec![(PhoneType::Home, "919-555-0100".into())];
    let result = person_ops::save_person(&mut conn, &ctx(&actor), request, &NoopNotifier);

    assert!(matches!(result, Err(CrmError::Database(_))));
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM users"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM profiles"), 0);
}

#[test]
fn welcome_notification_sent_once_on_creation() {
    let (mut conn, actor) = setup();
    let notifier = RecordingNotifier::new();

    let mut request = person_request("John", "Smith", "john@example.com");
    request.welcome = Some(MessageDescriptor::new(
        "person/new_account_email.txt",
        "Your account information",
    ));
    let record = person_ops::save_person(&mut conn, &ctx(&actor), request, &notifier)
        .unwrap()
        .saved()
        .unwrap();
    assert_eq!(*notifier.sent.borrow(), ["john@example.com"]);

    // Editing the same person never re-sends.
    let mut edit = person_request("John", "Smith", "john@example.com");
    edit.profile_id = Some(record.profile.id);
    edit.welcome = Some(MessageDescriptor::new(
        "person/new_account_email.txt",
        "Your account information",
    ));
    person_ops::save_person(&mut conn, &ctx(&actor), edit, &notifier)
        .unwrap()
        .saved()
        .unwrap();
    assert_eq!(notifier.sent.borrow().len(), 1);
}

#[test]
fn empty_descriptor_sends_nothing() {
    let (mut conn, actor) = setup();
    let notifier = RecordingNotifier::new();

    let mut request = person_request("John", "Smith", "john@example.com");
    request.welcome = Some(MessageDescriptor::new("", ""));
    person_ops::save_person(&mut conn, &ctx(&actor), request, &notifier)
        .unwrap()
        .saved()
        .unwrap();

    assert!(notifier.sent.borrow().is_empty());
}

#[test]
fn missing_descriptor_sends_nothing() {
    let (mut conn, actor) = setup();
    let notifier = RecordingNotifier::new();

    person_ops::save_person(
        &mut conn,
        &ctx(&actor),
        person_request("John", "Smith", "john@example.com"),
        &notifier,
    )
    .unwrap()
    .saved()
    .unwrap();

    assert!(notifier.sent.borrow().is_empty());
}

#[test]
fn notifier_failure_keeps_the_save() {
    let (mut conn, actor) = setup();
    let mut request = person_request("John", "Smith", "john@example.com");
    request.welcome = Some(MessageDescriptor::new(
        "person/new_account_email.txt",
        "Welcome!",
    ));
    let record = person_ops::save_person(&mut conn, &ctx(&actor), request, &FailingNotifier)
        .unwrap()
        .saved()
        .unwrap();

    assert!(record.created);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM users"), 2);
}

#[test]
fn save_person_requires_change_profile_permission() {
    let (mut conn, actor) = setup();
    let perms = StaticPermissions::new([Permission::ViewProfile]);
    let denied = RequestContext::new(actor.id, &perms);

    let result = person_ops::save_person(
        &mut conn,
        &denied,
        person_request("John", "Smith", "john@example.com"),
        &NoopNotifier,
    );

    assert!(matches!(result, Err(CrmError::PermissionDenied { .. })));
}

// ==========================================================================
// COMPOSITE BUSINESS SAVE
// ==========================================================================

fn business_request(name: &str) -> business_ops::BusinessSaveRequest {
    business_ops::BusinessSaveRequest {
        business: business_ops::BusinessFields {
            name: name.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn save_business_with_address() {
    let (mut conn, actor) = setup();
    let mut request = business_request("Caktus Group");
    request.address = Address {
        street: "108 Morris St".into(),
        city: "Durham".into(),
        state: "NC".into(),
        zip: "27701".into(),
    };
    let record = business_ops::save_business(&mut conn, &ctx(&actor), request)
        .unwrap()
        .saved()
        .unwrap();

    assert!(record.created);
    let address = record.address.unwrap();
    assert_eq!(address.city, "Durham");
}

#[test]
fn all_blank_address_is_not_created() {
    let (mut conn, actor) = setup();
    let record = business_ops::save_business(&mut conn, &ctx(&actor), business_request("Caktus"))
        .unwrap()
        .saved()
        .unwrap();

    assert!(record.address.is_none());
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM addresses"), 0);
}

#[test]
fn state_alone_does_not_create_address() {
    let (mut conn, actor) = setup();
    let mut request = business_request("Caktus");
    request.address.state = "NC".into();
    let record = business_ops::save_business(&mut conn, &ctx(&actor), request)
        .unwrap()
        .saved()
        .unwrap();

    assert!(record.address.is_none());
}

#[test]
fn save_business_rejects_bad_zip() {
    let (mut conn, actor) = setup();
    let mut request = business_request("Caktus");
    request.address.street = "108 Morris St".into();
    request.address.zip = "2770a".into();
    let errors = business_ops::save_business(&mut conn, &ctx(&actor), request)
        .unwrap()
        .invalid()
        .unwrap();

    assert!(!errors.messages("zip").is_empty());
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM businesses"), 0);
}

#[test]
fn blank_address_on_edit_keeps_stored_address() {
    let (mut conn, actor) = setup();
    let mut request = business_request("Caktus");
    request.address.street = "108 Morris St".into();
    let record = business_ops::save_business(&mut conn, &ctx(&actor), request)
        .unwrap()
        .saved()
        .unwrap();

    let mut edit = business_request("Caktus Group");
    edit.business_id = Some(record.business.id);
    let updated = business_ops::save_business(&mut conn, &ctx(&actor), edit)
        .unwrap()
        .saved()
        .unwrap();

    assert_eq!(updated.business.name, "Caktus Group");
    assert_eq!(updated.address.unwrap().street, "108 Morris St");
}

#[test]
fn business_type_tags_are_cleaned_and_replaced() {
    let (mut conn, actor) = setup();
    let mut request = business_request("Caktus");
    request.business.business_types = vec![" client ".into(), "client".into(), "vendor".into()];
    let record = business_ops::save_business(&mut conn, &ctx(&actor), request)
        .unwrap()
        .saved()
        .unwrap();
    assert_eq!(record.business.business_types, ["client", "vendor"]);

    let mut edit = business_request("Caktus");
    edit.business_id = Some(record.business.id);
    edit.business.business_types = vec!["client".into()];
    business_ops::save_business(&mut conn, &ctx(&actor), edit)
        .unwrap()
        .saved()
        .unwrap();

    let stored = business_repo::find_by_id(&conn, record.business.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.business_types, ["client"]);
}

// ==========================================================================
// PROJECT SAVE
// ==========================================================================

fn saved_business(conn: &mut rusqlite::Connection, actor: &User, name: &str) -> Business {
    business_ops::save_business(conn, &ctx(actor), business_request(name))
        .unwrap()
        .saved()
        .unwrap()
        .business
}

fn project_request(business: &Business, actor: &User, name: &str) -> project_ops::ProjectSaveRequest {
    project_ops::ProjectSaveRequest {
        project_id: None,
        business_id: business.id,
        fields: project_ops::ProjectFields {
            name: name.into(),
            kind: ProjectKind::Development,
            status: ProjectStatus::Requested,
            description: None,
            point_person_id: actor.id,
            tracking_ref: None,
        },
    }
}

#[test]
fn save_project_creates_under_business() {
    let (mut conn, actor) = setup();
    let business = saved_business(&mut conn, &actor, "Caktus");
    let project = project_ops::save_project(
        &mut conn,
        &ctx(&actor),
        project_request(&business, &actor, "Website Redesign"),
    )
    .unwrap()
    .saved()
    .unwrap();

    assert_eq!(project.business_id, business.id);
    assert_eq!(project.status, ProjectStatus::Requested);
}

#[test]
fn save_project_unknown_business_is_not_found() {
    let (mut conn, actor) = setup();
    let business = Business::create("Ghost".into());
    let result = project_ops::save_project(
        &mut conn,
        &ctx(&actor),
        project_request(&business, &actor, "Website Redesign"),
    );

    assert!(matches!(result, Err(CrmError::NotFound { .. })));
}

#[test]
fn save_project_updates_status() {
    let (mut conn, actor) = setup();
    let business = saved_business(&mut conn, &actor, "Caktus");
    let project = project_ops::save_project(
        &mut conn,
        &ctx(&actor),
        project_request(&business, &actor, "Website Redesign"),
    )
    .unwrap()
    .saved()
    .unwrap();

    let mut edit = project_request(&business, &actor, "Website Redesign");
    edit.project_id = Some(project.id);
    edit.fields.status = ProjectStatus::InProgress;
    let updated = project_ops::save_project(&mut conn, &ctx(&actor), edit)
        .unwrap()
        .saved()
        .unwrap();

    assert_eq!(updated.id, project.id);
    assert_eq!(updated.status, ProjectStatus::InProgress);
}

// ==========================================================================
// RELATIONSHIP MANAGER
// ==========================================================================

use crm::ops::relationship_ops::{ContactTarget, DetachOutcome};

#[test]
fn associate_with_project_twice_leaves_one_row() {
    let (mut conn, actor) = setup();
    let business = saved_business(&mut conn, &actor, "Caktus");
    let project = project_ops::save_project(
        &mut conn,
        &ctx(&actor),
        project_request(&business, &actor, "Website Redesign"),
    )
    .unwrap()
    .saved()
    .unwrap();

    let target = ContactTarget::Project(project.id);
    relationship_ops::associate(&mut conn, &ctx(&actor), actor.id, target).unwrap();
    relationship_ops::associate(&mut conn, &ctx(&actor), actor.id, target).unwrap();

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM project_relationships"), 1);
}

#[test]
fn associate_with_business_is_idempotent() {
    let (mut conn, actor) = setup();
    let business = saved_business(&mut conn, &actor, "Caktus");

    let target = ContactTarget::Business(business.id);
    relationship_ops::associate(&mut conn, &ctx(&actor), actor.id, target).unwrap();
    relationship_ops::associate(&mut conn, &ctx(&actor), actor.id, target).unwrap();

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM business_contacts"), 1);
}

#[test]
fn disassociate_missing_membership_reports_not_found() {
    let (mut conn, actor) = setup();
    let business = saved_business(&mut conn, &actor, "Caktus");

    let outcome = relationship_ops::disassociate(
        &mut conn,
        &ctx(&actor),
        actor.id,
        ContactTarget::Business(business.id),
    )
    .unwrap();

    assert_eq!(outcome, DetachOutcome::NotFound);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM business_contacts"), 0);
}

#[test]
fn disassociate_removes_project_relationship() {
    let (mut conn, actor) = setup();
    let business = saved_business(&mut conn, &actor, "Caktus");
    let project = project_ops::save_project(
        &mut conn,
        &ctx(&actor),
        project_request(&business, &actor, "Website Redesign"),
    )
    .unwrap()
    .saved()
    .unwrap();

    let target = ContactTarget::Project(project.id);
    relationship_ops::associate(&mut conn, &ctx(&actor), actor.id, target).unwrap();
    let outcome =
        relationship_ops::disassociate(&mut conn, &ctx(&actor), actor.id, target).unwrap();

    assert_eq!(outcome, DetachOutcome::Removed);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM project_relationships"), 0);
}

#[test]
fn set_relationship_types_replaces_previous_set() {
    let (mut conn, actor) = setup();
    let business = saved_business(&mut conn, &actor, "Caktus");
    let project = project_ops::save_project(
        &mut conn,
        &ctx(&actor),
        project_request(&business, &actor, "Website Redesign"),
    )
    .unwrap()
    .saved()
    .unwrap();
    relationship_ops::associate(
        &mut conn,
        &ctx(&actor),
        actor.id,
        ContactTarget::Project(project.id),
    )
    .unwrap();

    relationship_ops::set_relationship_types(
        &mut conn,
        &ctx(&actor),
        project.id,
        actor.id,
        vec!["developer".into(), "billing contact".into()],
    )
    .unwrap();
    let relationship = relationship_ops::set_relationship_types(
        &mut conn,
        &ctx(&actor),
        project.id,
        actor.id,
        vec!["developer".into()],
    )
    .unwrap();

    assert_eq!(relationship.types, ["developer"]);
    let stored = project_repo::find_relationship(&conn, project.id, actor.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.types, ["developer"]);
}

#[test]
fn set_relationship_types_without_membership_is_not_found() {
    let (mut conn, actor) = setup();
    let business = saved_business(&mut conn, &actor, "Caktus");
    let project = project_ops::save_project(
        &mut conn,
        &ctx(&actor),
        project_request(&business, &actor, "Website Redesign"),
    )
    .unwrap()
    .saved()
    .unwrap();

    let result = relationship_ops::set_relationship_types(
        &mut conn,
        &ctx(&actor),
        project.id,
        actor.id,
        vec!["developer".into()],
    );

    assert!(matches!(result, Err(CrmError::NotFound { .. })));
}

#[test]
fn associate_requires_both_change_permissions() {
    let (mut conn, actor) = setup();
    let business = saved_business(&mut conn, &actor, "Caktus");

    let perms = StaticPermissions::new([Permission::ChangeBusiness]);
    let denied = RequestContext::new(actor.id, &perms);
    let result = relationship_ops::associate(
        &mut conn,
        &denied,
        actor.id,
        ContactTarget::Business(business.id),
    );

    assert!(matches!(result, Err(CrmError::PermissionDenied { .. })));
}

// ==========================================================================
// INTERACTIONS
// ==========================================================================

use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn interaction_request(
    subject: Option<Id<Profile>>,
    d: NaiveDate,
) -> interaction_ops::InteractionSaveRequest {
    interaction_ops::InteractionSaveRequest {
        interaction_id: None,
        subject,
        fields: interaction_ops::InteractionFields {
            date: d,
            kind: InteractionKind::PhoneCall,
            completed: false,
            memo: None,
            project_id: None,
            contacts: Vec::new(),
        },
    }
}

#[test]
fn new_interaction_attaches_subject_and_actor() {
    let (mut conn, actor) = setup();
    let person = person_ops::save_person(
        &mut conn,
        &ctx(&actor),
        person_request("John", "Smith", "john@example.com"),
        &NoopNotifier,
    )
    .unwrap()
    .saved()
    .unwrap();

    let interaction = interaction_ops::save_interaction(
        &mut conn,
        &ctx(&actor),
        interaction_request(Some(person.profile.id), date(2009, 7, 14)),
    )
    .unwrap();

    assert_eq!(interaction.contacts.len(), 2);
    assert!(interaction.contacts.contains(&person.user.id));
    assert!(interaction.contacts.contains(&actor.id));
}

#[test]
fn explicit_contacts_are_kept_alongside_auto_attached() {
    let (mut conn, actor) = setup();
    let person = person_ops::save_person(
        &mut conn,
        &ctx(&actor),
        person_request("John", "Smith", "john@example.com"),
        &NoopNotifier,
    )
    .unwrap()
    .saved()
    .unwrap();
    let other = person_ops::save_person(
        &mut conn,
        &ctx(&actor),
        person_request("Jane", "Doe", "jane@example.com"),
        &NoopNotifier,
    )
    .unwrap()
    .saved()
    .unwrap();

    let mut request = interaction_request(Some(person.profile.id), date(2009, 7, 14));
    request.fields.contacts = vec![other.user.id];
    let interaction = interaction_ops::save_interaction(&mut conn, &ctx(&actor), request).unwrap();

    assert_eq!(interaction.contacts.len(), 3);
}

#[test]
fn update_does_not_reattach_contacts() {
    let (mut conn, actor) = setup();
    let person = person_ops::save_person(
        &mut conn,
        &ctx(&actor),
        person_request("John", "Smith", "john@example.com"),
        &NoopNotifier,
    )
    .unwrap()
    .saved()
    .unwrap();

    let interaction = interaction_ops::save_interaction(
        &mut conn,
        &ctx(&actor),
        interaction_request(Some(person.profile.id), date(2009, 7, 14)),
    )
    .unwrap();

    let mut edit = interaction_request(None, date(2009, 7, 14));
    edit.interaction_id = Some(interaction.id);
    edit.fields.contacts = vec![person.user.id];
    let updated = interaction_ops::save_interaction(&mut conn, &ctx(&actor), edit).unwrap();

    assert_eq!(updated.contacts, vec![person.user.id]);
}

#[test]
fn completed_flag_flips_both_ways() {
    let (mut conn, actor) = setup();
    let interaction = interaction_ops::save_interaction(
        &mut conn,
        &ctx(&actor),
        interaction_request(None, date(2009, 7, 14)),
    )
    .unwrap();
    assert!(!interaction.completed);

    let mut complete = interaction_request(None, date(2009, 7, 14));
    complete.interaction_id = Some(interaction.id);
    complete.fields.completed = true;
    assert!(
        interaction_ops::save_interaction(&mut conn, &ctx(&actor), complete)
            .unwrap()
            .completed
    );

    let mut reopen = interaction_request(None, date(2009, 7, 14));
    reopen.interaction_id = Some(interaction.id);
    reopen.fields.completed = false;
    assert!(
        !interaction_ops::save_interaction(&mut conn, &ctx(&actor), reopen)
            .unwrap()
            .completed
    );
}

#[test]
fn delete_interaction_removes_it() {
    let (mut conn, actor) = setup();
    let interaction = interaction_ops::save_interaction(
        &mut conn,
        &ctx(&actor),
        interaction_request(None, date(2009, 7, 14)),
    )
    .unwrap();

    interaction_ops::delete_interaction(&conn, &ctx(&actor), interaction.id).unwrap();

    assert!(interaction_repo::find_by_id(&conn, interaction.id)
        .unwrap()
        .is_none());
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM interaction_contacts"), 0);
}

#[test]
fn delete_interaction_requires_permission() {
    let (mut conn, actor) = setup();
    let interaction = interaction_ops::save_interaction(
        &mut conn,
        &ctx(&actor),
        interaction_request(None, date(2009, 7, 14)),
    )
    .unwrap();

    let perms = StaticPermissions::new([Permission::ChangeInteraction]);
    let denied = RequestContext::new(actor.id, &perms);
    let result = interaction_ops::delete_interaction(&conn, &denied, interaction.id);

    assert!(matches!(result, Err(CrmError::PermissionDenied { .. })));
}
