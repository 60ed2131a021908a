//! Integration tests for slug allocation against the slug tables.

use assert_matches::assert_matches;
use reviews_core::canonical_slug::{resolve_slug_or_id, update_slug};
use reviews_core::error::CoreError;
use reviews_core::language::Language;
use reviews_core::revision::{create_first_revision, new_revision, save, Document};
use reviews_core::slug::SlugPolicy;
use reviews_core::slug_allocator::allocate;
use reviews_core::store::SlugStore;
use reviews_db::models::team::{CreateTeam, Team};
use reviews_db::models::thing::{CreateThing, Thing, UpdateThing};
use reviews_db::Stores;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn team_input(name: &str) -> CreateTeam {
    CreateTeam {
        name: name.to_string(),
        motto: None,
        description: None,
        rules: None,
        mod_approval_to_join: None,
        only_mods_can_blog: None,
        language: None,
    }
}

async fn create_team(stores: &Stores, name: &str) -> Document<Team> {
    let actor = Uuid::new_v4();
    let team = Team::new(&team_input(name), Language::English, actor);
    let mut doc = create_first_revision(team, actor, &["create-via-form"]);
    update_slug(
        &stores.team_slugs,
        &SlugPolicy::default(),
        &mut doc,
        actor,
        Language::English,
    )
    .await
    .unwrap();
    save(&stores.teams, &mut doc).await.unwrap();
    doc
}

async fn create_thing(stores: &Stores, label: &str) -> Document<Thing> {
    let actor = Uuid::new_v4();
    let input = CreateThing {
        urls: vec!["https://zombo.com/".into()],
        label: Some(label.to_string()),
        description: None,
        language: None,
    };
    let mut doc = create_first_revision(
        Thing::new(&input, Language::English, actor),
        actor,
        &["create-via-form"],
    );
    update_slug(
        &stores.thing_slugs,
        &SlugPolicy::default(),
        &mut doc,
        actor,
        Language::English,
    )
    .await
    .unwrap();
    save(&stores.things, &mut doc).await.unwrap();
    doc
}

// ---------------------------------------------------------------------------
// Disambiguation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn same_team_name_three_times_is_qualified(pool: PgPool) {
    let stores = Stores::new(pool);
    let mut names = Vec::new();
    for _ in 0..3 {
        let team = create_team(&stores, "Annoyed QA Team").await;
        names.push(team.data.canonical_slug_name.unwrap());
    }
    assert_eq!(names, vec!["annoyed-qa-team", "annoyed-qa-team-2", "annoyed-qa-team-3"]);

    let latest = stores
        .team_slugs
        .find_latest_by_base("annoyed-qa-team")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.qualifier_part.as_deref(), Some("3"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reallocation_for_owner_is_idempotent(pool: PgPool) {
    let stores = Stores::new(pool);
    let policy = SlugPolicy::default();
    let (owner, actor) = (Uuid::new_v4(), Uuid::new_v4());

    let a = allocate(&stores.thing_slugs, &policy, "zombo.com", owner, actor)
        .await
        .unwrap();
    let b = allocate(&stores.thing_slugs, &policy, "zombo.com", owner, actor)
        .await
        .unwrap();
    assert_eq!(a.name, b.name);
    assert_eq!(stores.thing_slugs.list_for_owner(owner).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserved_name_is_qualified(pool: PgPool) {
    let stores = Stores::new(pool);
    let thing = create_thing(&stores, "Register").await;
    assert_eq!(thing.data.canonical_slug_name.as_deref(), Some("register-2"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn namespaces_are_independent(pool: PgPool) {
    let stores = Stores::new(pool);
    let thing = create_thing(&stores, "Annoyed QA Team").await;
    let team = create_team(&stores, "Annoyed QA Team").await;
    assert_eq!(thing.data.canonical_slug_name.as_deref(), Some("annoyed-qa-team"));
    assert_eq!(team.data.canonical_slug_name.as_deref(), Some("annoyed-qa-team"));
}

// ---------------------------------------------------------------------------
// Renames and resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn rename_keeps_old_slug_with_redirect(pool: PgPool) {
    let stores = Stores::new(pool);
    let policy = SlugPolicy::default();
    let actor = Uuid::new_v4();
    let thing = create_thing(&stores, "Zombo").await;

    let mut thing = new_revision(&stores.things, thing, actor, &["edit-via-form"])
        .await
        .unwrap();
    thing.data.apply(
        &UpdateThing {
            urls: None,
            label: Some("Zombo.com".into()),
            aliases: None,
            description: None,
            language: None,
        },
        Language::English,
    );
    update_slug(&stores.thing_slugs, &policy, &mut thing, actor, Language::English)
        .await
        .unwrap();
    save(&stores.things, &mut thing).await.unwrap();

    let old = resolve_slug_or_id(&stores.things, &stores.thing_slugs, "zombo")
        .await
        .unwrap();
    assert_eq!(old.document.id, thing.id);
    assert_eq!(old.redirect_to.as_deref(), Some("zombo.com"));

    let current = resolve_slug_or_id(&stores.things, &stores.thing_slugs, "zombo.com")
        .await
        .unwrap();
    assert!(!current.redirect_required());

    let owned = stores.thing_slugs.list_for_owner(thing.id).await.unwrap();
    let owned: Vec<_> = owned.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(owned, vec!["zombo", "zombo.com"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_slug_is_not_found(pool: PgPool) {
    let stores = Stores::new(pool);
    assert_matches!(
        resolve_slug_or_id(&stores.teams, &stores.team_slugs, "nobody-here").await,
        Err(CoreError::NotFound { entity: "team", .. })
    );
}
