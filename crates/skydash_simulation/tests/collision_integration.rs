//! Collision resolver integration test
//!
//! Trigger-диспатч по authored-категориям, shield gating ракет и врагов,
//! achievement milestone, despawn подобранных капсул.

use bevy::prelude::*;
use skydash_simulation::*;

fn create_test_app() -> App {
    let mut app = create_headless_app(42);
    app.add_plugins(SimulationPlugin);
    app.init_resource::<BridgeCounts>();
    app.add_systems(Update, count_bridge_events);
    app
}

fn spawn_test_avatar(app: &mut App) -> Entity {
    let avatar = {
        let mut commands = app.world_mut().commands();
        spawn_avatar(
            &mut commands,
            MovementConfig::default(),
            Vec3::new(0.0, 1.0, 0.0),
        )
    };
    app.update();
    avatar
}

fn start_session(app: &mut App) {
    app.world_mut().send_event(GameInit);
    app.update();
    app.world_mut().send_event(GameStart);
    app.update();
}

fn send_contact(app: &mut App, avatar: Entity, other: Entity, kind: ContactKind) {
    app.world_mut().send_event(ContactEvent {
        avatar,
        other,
        kind,
    });
    app.update();
}

/// Счётчик bridge-событий (события живут два кадра — копим в ресурс)
#[derive(Resource, Default)]
struct BridgeCounts {
    achievements: u32,
    explosions: u32,
}

fn count_bridge_events(
    mut achievements: EventReader<AchievementSubmit>,
    mut explosions: EventReader<AvatarExploded>,
    mut counts: ResMut<BridgeCounts>,
) {
    counts.achievements += achievements.read().count() as u32;
    counts.explosions += explosions.read().count() as u32;
}

#[test]
fn test_coin_grows_avatar_and_disables_coin() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    let scale_before = app.world().get::<SizeScale>(avatar).unwrap().scale;
    let coin = app.world_mut().spawn(ContactCategory::Coin).id();

    send_contact(&mut app, avatar, coin, ContactKind::Trigger);

    let scale_after = app.world().get::<SizeScale>(avatar).unwrap().scale;
    assert!(scale_after > scale_before);
    assert!(app.world().get::<Inactive>(coin).is_some());

    let ui_events = app.world().resource::<Events<UiCommand>>();
    let commands: Vec<UiCommand> = ui_events.get_cursor().read(ui_events).copied().collect();
    assert!(commands.contains(&UiCommand::AddCoin));
}

#[test]
fn test_cannon_contact_refills_ammo() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    let cannon = app
        .world_mut()
        .spawn((ContactCategory::Cannon, CannonAmmo::new(6)))
        .id();
    app.world_mut().get_mut::<CannonAmmo>(cannon).unwrap().rounds = 1;

    send_contact(&mut app, avatar, cannon, ContactKind::Trigger);

    assert_eq!(app.world().get::<CannonAmmo>(cannon).unwrap().rounds, 6);
}

#[test]
fn test_pickup_dispatch_table() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    let color_cases = [
        (PickupKind::Red, ColorKind::Red),
        (PickupKind::Green, ColorKind::Green),
        (PickupKind::Blue, ColorKind::Blue),
        (PickupKind::Yellow, ColorKind::Yellow),
    ];

    for (kind, expected) in color_cases {
        let pickup = app
            .world_mut()
            .spawn((ContactCategory::Pickup, PickupItem::new(kind)))
            .id();
        send_contact(&mut app, avatar, pickup, ContactKind::Trigger);

        let color = app.world().get::<AvatarColor>(avatar).unwrap();
        assert_eq!(color.current, expected, "kind {:?}", kind);
    }

    // Shoot → оружие
    let pickup = app
        .world_mut()
        .spawn((ContactCategory::Pickup, PickupItem::new(PickupKind::Shoot)))
        .id();
    send_contact(&mut app, avatar, pickup, ContactKind::Trigger);
    assert!(app.world().get::<Weapon>(avatar).unwrap().firing);

    // Force → защитное поле
    let pickup = app
        .world_mut()
        .spawn((ContactCategory::Pickup, PickupItem::new(PickupKind::Force)))
        .id();
    send_contact(&mut app, avatar, pickup, ContactKind::Trigger);
    assert!(app.world().get::<ForceField>(avatar).unwrap().is_on());

    assert_eq!(app.world().resource::<SessionCounters>().capsules, 6);
}

#[test]
fn test_unknown_pickup_kind_is_noop_but_counted() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    let pickup = app
        .world_mut()
        .spawn((ContactCategory::Pickup, PickupItem::new(PickupKind::Unknown)))
        .id();
    send_contact(&mut app, avatar, pickup, ContactKind::Trigger);

    // Капсула посчитана, эффектов нет
    assert_eq!(app.world().resource::<SessionCounters>().capsules, 1);
    assert!(!app.world().get::<Weapon>(avatar).unwrap().firing);
    assert!(!app.world().get::<ForceField>(avatar).unwrap().is_on());
}

#[test]
fn test_picked_capsule_despawns_after_timeout() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    let pickup = app
        .world_mut()
        .spawn((ContactCategory::Pickup, PickupItem::new(PickupKind::Red)))
        .id();
    send_contact(&mut app, avatar, pickup, ContactKind::Trigger);
    app.update();

    // Подобрана: анимация погашена, деспавн запланирован
    assert!(app.world().get::<Inactive>(pickup).is_some());
    assert!(app.world().get::<DespawnAfter>(pickup).is_some());

    // 0.6 сек + запас
    for _ in 0..60 {
        app.update();
    }
    assert!(app.world().get_entity(pickup).is_err());
}

#[test]
fn test_missile_with_shield_absorbed() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    {
        let mut force_field = app.world_mut().get_mut::<ForceField>(avatar).unwrap();
        force_field.activate();
    }
    {
        let mut weapon = app.world_mut().get_mut::<Weapon>(avatar).unwrap();
        weapon.start_firing();
    }

    let missile = app.world_mut().spawn(ContactCategory::Missile).id();
    send_contact(&mut app, avatar, missile, ContactKind::Trigger);

    // Поле поглотило: выключено, оружие остановлено, ракета погашена
    assert!(!app.world().get::<ForceField>(avatar).unwrap().is_on());
    assert!(!app.world().get::<Weapon>(avatar).unwrap().firing);
    assert!(app.world().get::<Inactive>(missile).is_some());

    // Счётчик и взрыв подавлены полностью
    assert_eq!(app.world().resource::<SessionCounters>().missiles_collided, 0);
    app.update();
    assert_eq!(app.world().resource::<BridgeCounts>().explosions, 0);

    let audio_events = app.world().resource::<Events<AudioCue>>();
    let cues: Vec<AudioCue> = audio_events.get_cursor().read(audio_events).copied().collect();
    assert!(cues.contains(&AudioCue::ShieldAbsorb));
}

#[test]
fn test_missile_without_shield_counts_and_explodes() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    let missile = app.world_mut().spawn(ContactCategory::Missile).id();
    send_contact(&mut app, avatar, missile, ContactKind::Trigger);
    app.update();

    assert_eq!(app.world().resource::<SessionCounters>().missiles_collided, 1);
    assert_eq!(
        app.world()
            .resource::<StatStoreHandle>()
            .session_value(SessionKey::MissilesCollided),
        1
    );
    assert_eq!(app.world().resource::<BridgeCounts>().explosions, 1);
    assert!(app.world().get::<Inactive>(missile).is_some());
}

#[test]
fn test_missile_milestone_submits_achievement_once() {
    let mut app = create_test_app();

    // 9 lifetime попаданий из прошлых сессий, порог 10
    let mut store = InMemoryStatStore::default();
    store.set_value(SessionKey::MissilesCollided, 9);
    store.begin_session();
    app.insert_resource(StatStoreHandle::new(store));

    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    let missile = app.world_mut().spawn(ContactCategory::Missile).id();
    send_contact(&mut app, avatar, missile, ContactKind::Trigger);
    app.update();

    let store = app.world().resource::<StatStoreHandle>();
    assert_eq!(store.session_value(SessionKey::MissilesCollided), 1);
    assert_eq!(store.lifetime_total(SessionKey::MissilesCollided), 10);
    assert_eq!(app.world().resource::<BridgeCounts>().explosions, 1);
    assert_eq!(app.world().resource::<BridgeCounts>().achievements, 1);

    // Следующее попадание выше порога сабмит не дублирует
    let missile = app.world_mut().spawn(ContactCategory::Missile).id();
    send_contact(&mut app, avatar, missile, ContactKind::Trigger);
    app.update();

    assert_eq!(
        app.world()
            .resource::<StatStoreHandle>()
            .lifetime_total(SessionKey::MissilesCollided),
        11
    );
    assert_eq!(app.world().resource::<BridgeCounts>().achievements, 1);
}

#[test]
fn test_enemy_persist_shield_absorbs_without_damage() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    {
        let mut force_field = app.world_mut().get_mut::<ForceField>(avatar).unwrap();
        force_field.activate();
    }
    let scale_before = app.world().get::<SizeScale>(avatar).unwrap().scale;

    let enemy = app
        .world_mut()
        .spawn((ContactCategory::Enemy, SizeScale::default()))
        .id();
    send_contact(&mut app, avatar, enemy, ContactKind::Persist);

    // Поле поглотило контакт вместо урона
    assert!(!app.world().get::<ForceField>(avatar).unwrap().is_on());
    assert_eq!(
        app.world()
            .get::<MovementState>(avatar)
            .unwrap()
            .enemies_collided,
        0
    );
    assert_eq!(app.world().get::<SizeScale>(avatar).unwrap().scale, scale_before);
    assert_eq!(app.world().get::<SizeScale>(enemy).unwrap().scale, 1.0);
}

#[test]
fn test_enemy_persist_counts_once_per_episode() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    {
        let mut weapon = app.world_mut().get_mut::<Weapon>(avatar).unwrap();
        weapon.start_firing();
    }

    let enemy = app
        .world_mut()
        .spawn((ContactCategory::Enemy, SizeScale::default()))
        .id();

    send_contact(&mut app, avatar, enemy, ContactKind::Persist);

    let state = app.world().get::<MovementState>(avatar).unwrap();
    assert_eq!(state.enemies_collided, 1);
    assert!(!app.world().get::<Weapon>(avatar).unwrap().firing);
    assert!(app.world().get::<SizeScale>(avatar).unwrap().scale < 1.0);
    assert!(app.world().get::<SizeScale>(enemy).unwrap().scale < 1.0);

    // Persist в том же эпизоде — не считается
    send_contact(&mut app, avatar, enemy, ContactKind::Persist);
    assert_eq!(
        app.world()
            .get::<MovementState>(avatar)
            .unwrap()
            .enemies_collided,
        1
    );

    // После End начинается новый эпизод
    send_contact(&mut app, avatar, enemy, ContactKind::End);
    app.update();
    send_contact(&mut app, avatar, enemy, ContactKind::Persist);
    assert_eq!(
        app.world()
            .get::<MovementState>(avatar)
            .unwrap()
            .enemies_collided,
        2
    );
}

#[test]
fn test_enemy_trigger_variant_is_noop() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    let enemy = app
        .world_mut()
        .spawn((ContactCategory::Enemy, SizeScale::default()))
        .id();
    // Trigger-вариант врага: авторитетный путь — Persist, здесь no-op
    send_contact(&mut app, avatar, enemy, ContactKind::Trigger);

    assert_eq!(
        app.world()
            .get::<MovementState>(avatar)
            .unwrap()
            .enemies_collided,
        0
    );
    assert_eq!(app.world().get::<SizeScale>(enemy).unwrap().scale, 1.0);
}

#[test]
fn test_platform_persist_and_end_toggle_grounding() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    let platform = app.world_mut().spawn(ContactCategory::Platform).id();

    // Рукой взводим double jump — Persist обязан его вернуть
    app.world_mut()
        .get_mut::<MovementState>(avatar)
        .unwrap()
        .on_double_jump = true;

    send_contact(&mut app, avatar, platform, ContactKind::Persist);
    let state = app.world().get::<MovementState>(avatar).unwrap();
    assert!(state.touching_platform);
    assert!(!state.on_double_jump);

    send_contact(&mut app, avatar, platform, ContactKind::End);
    assert!(
        !app.world()
            .get::<MovementState>(avatar)
            .unwrap()
            .touching_platform
    );
}

#[test]
fn test_uncategorized_contact_is_ignored() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    // Entity без ContactCategory — malformed input, no-op
    let stray = app.world_mut().spawn_empty().id();
    send_contact(&mut app, avatar, stray, ContactKind::Trigger);
    send_contact(&mut app, avatar, stray, ContactKind::Persist);

    let counters = app.world().resource::<SessionCounters>();
    assert_eq!(counters.capsules, 0);
    assert_eq!(counters.missiles_collided, 0);
    assert_eq!(
        app.world()
            .get::<MovementState>(avatar)
            .unwrap()
            .enemies_collided,
        0
    );
}

#[test]
fn test_counters_reset_on_new_session_lifetime_kept() {
    let mut app = create_test_app();
    let avatar = spawn_test_avatar(&mut app);
    start_session(&mut app);

    let missile = app.world_mut().spawn(ContactCategory::Missile).id();
    send_contact(&mut app, avatar, missile, ContactKind::Trigger);
    assert_eq!(app.world().resource::<SessionCounters>().missiles_collided, 1);

    // Конец сессии и новая
    app.world_mut().send_event(GameOver);
    app.update();
    app.world_mut().send_event(GameInit);
    app.update();
    app.world_mut().send_event(GameStart);
    app.update();
    app.update();

    assert_eq!(app.world().resource::<SessionCounters>().missiles_collided, 0);
    // Lifetime-тотал пережил begin_session
    assert_eq!(
        app.world()
            .resource::<StatStoreHandle>()
            .lifetime_total(SessionKey::MissilesCollided),
        1
    );
}
