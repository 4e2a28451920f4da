use cinder_core::define_component;
use cinder_core::ecs::{
    ComponentArray, Coordinator, EcsError, Entity, ErrorKind, System, SystemContext,
    MAX_ENTITIES,
};
use cinder_core::spawn;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}
define_component!(Position);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}
define_component!(Velocity);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Health(i32);
define_component!(Health);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Serial(u32);
define_component!(Serial);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Letter(char);
define_component!(Letter);

#[derive(Default)]
struct Physics {
    steps: u32,
}

impl System for Physics {
    fn update(&mut self, ctx: &mut SystemContext<'_>, dt: f32) {
        for entity in ctx.entity_list() {
            let velocity = *ctx.component::<Velocity>(entity).unwrap();
            let position = ctx.component_mut::<Position>(entity).unwrap();
            position.x += velocity.x * dt;
            position.y += velocity.y * dt;
        }
        self.steps += 1;
    }
}

struct Medic;

impl System for Medic {
    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f32) {
        for entity in ctx.entity_list() {
            if ctx.component::<Health>(entity).unwrap().0 <= 0 {
                ctx.commands().destroy_entity(entity);
            }
        }
    }
}

fn world_with(capacity: usize) -> Coordinator {
    let mut world = Coordinator::with_entity_capacity(capacity).unwrap();
    world.register_component::<Position>().unwrap();
    world.register_component::<Velocity>().unwrap();
    world.register_component::<Health>().unwrap();
    world
}

fn pos(x: f32) -> Position {
    Position { x, y: 0.0 }
}

#[test]
fn storage_stays_dense_through_churn() {
    let mut storage = ComponentArray::<Serial>::new();
    for id in 0..100 {
        storage.insert(Entity::from_raw(id), Serial(id));
    }
    for id in (0..100).step_by(3) {
        storage.remove(Entity::from_raw(id)).unwrap();
    }
    for id in 100..110 {
        storage.insert(Entity::from_raw(id), Serial(id));
    }

    assert_eq!(storage.len(), 100 - 34 + 10);
    for (entity, value) in storage.iter() {
        assert_eq!(entity.id(), value.0);
        assert_eq!(storage.get(entity), Ok(value));
    }
}

#[test]
fn removing_middle_moves_last_into_its_slot() {
    let (a, b, c) = (Entity::from_raw(0), Entity::from_raw(1), Entity::from_raw(2));
    let mut storage = ComponentArray::new();
    storage.insert(a, Letter('A'));
    storage.insert(b, Letter('B'));
    storage.insert(c, Letter('C'));

    assert_eq!(storage.len(), 3);
    assert_eq!(storage.remove(b), Ok(Letter('B')));
    assert_eq!(storage.len(), 2);
    let order: Vec<(Entity, char)> = storage.iter().map(|(e, v)| (e, v.0)).collect();
    assert_eq!(order, vec![(a, 'A'), (c, 'C')]);
    assert_eq!(storage.get(c), Ok(&Letter('C')));
    assert!(!storage.contains(b));
}

#[test]
fn membership_follows_component_changes() {
    let mut world = world_with(16);
    world.register_system(Physics::default()).unwrap();
    let required = world.signature_of::<(Position, Velocity)>().unwrap();
    world.set_system_signature::<Physics>(required).unwrap();

    let e = world.create_entity().unwrap();
    world.add_component(e, pos(0.0)).unwrap();
    assert!(world.system_entities::<Physics>().unwrap().is_empty());

    world.add_component(e, Velocity { x: 1.0, y: 2.0 }).unwrap();
    assert!(world.system_entities::<Physics>().unwrap().contains(&e));

    world.add_component(e, Health(10)).unwrap();
    assert!(world.system_entities::<Physics>().unwrap().contains(&e));

    world.remove_component::<Position>(e).unwrap();
    assert!(world.system_entities::<Physics>().unwrap().is_empty());

    world.add_component(e, pos(3.0)).unwrap();
    assert!(world.system_entities::<Physics>().unwrap().contains(&e));

    world.remove_component::<Velocity>(e).unwrap();
    assert!(world.system_entities::<Physics>().unwrap().is_empty());
}

#[test]
fn destroy_cascades_and_recycled_id_starts_clean() {
    let mut world = world_with(1);
    world.register_system(Physics::default()).unwrap();
    world.register_system(Medic).unwrap();
    let moving = world.signature_of::<(Position, Velocity)>().unwrap();
    world.set_system_signature::<Physics>(moving).unwrap();
    let mortal = world.signature_of::<(Health,)>().unwrap();
    world.set_system_signature::<Medic>(mortal).unwrap();

    let e = spawn!(world, pos(1.0), Velocity { x: 0.0, y: 0.0 }, Health(3)).unwrap();
    assert_eq!(world.entity_signature(e).unwrap().count(), 3);

    world.destroy_entity(e).unwrap();
    assert_eq!(world.component_count::<Position>(), Ok(0));
    assert_eq!(world.component_count::<Velocity>(), Ok(0));
    assert_eq!(world.component_count::<Health>(), Ok(0));
    assert!(world.system_entities::<Physics>().unwrap().is_empty());
    assert!(world.system_entities::<Medic>().unwrap().is_empty());

    // Capacity one forces the same id back out.
    let reused = world.create_entity().unwrap();
    assert_eq!(reused, e);
    assert!(world.entity_signature(reused).unwrap().is_empty());
    assert!(!world.has_component::<Health>(reused));
    assert!(world.system_entities::<Medic>().unwrap().is_empty());
}

#[test]
fn pool_exhausts_exactly_at_capacity() {
    let mut world = Coordinator::new();
    for _ in 0..MAX_ENTITIES {
        world.create_entity().unwrap();
    }
    let err = world.create_entity().unwrap_err();
    assert_eq!(
        err,
        EcsError::EntityCapacityExceeded {
            capacity: MAX_ENTITIES
        }
    );
    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    assert_eq!(world.living_entity_count(), MAX_ENTITIES);

    world.destroy_entity(Entity::from_raw(42)).unwrap();
    assert_eq!(world.create_entity(), Ok(Entity::from_raw(42)));
}

#[test]
fn duplicate_registration_keeps_first_id() {
    let mut world = Coordinator::new();
    let first = world.register_component::<Position>().unwrap();
    world.register_component::<Velocity>().unwrap();

    let err = world.register_component::<Position>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateRegistration);
    assert_eq!(world.component_type::<Position>(), Ok(first));

    world.register_system(Medic).unwrap();
    assert_eq!(
        world.register_system(Medic).unwrap_err().kind(),
        ErrorKind::DuplicateRegistration
    );
    assert_eq!(world.system_count(), 1);
}

#[test]
fn systems_run_and_flush_commands() {
    let mut world = world_with(8);
    world.register_system(Physics::default()).unwrap();
    world.register_system(Medic).unwrap();
    let moving = world.signature_of::<(Position, Velocity)>().unwrap();
    world.set_system_signature::<Physics>(moving).unwrap();
    let mortal = world.signature_of::<(Health,)>().unwrap();
    world.set_system_signature::<Medic>(mortal).unwrap();

    let runner = spawn!(world, pos(0.0), Velocity { x: 2.0, y: 0.0 }, Health(5)).unwrap();
    let corpse = spawn!(world, Health(0)).unwrap();

    world.run_systems(0.5).unwrap();
    assert_eq!(world.get_component::<Position>(runner), Ok(&pos(1.0)));
    assert!(world.is_alive(runner));
    assert!(!world.is_alive(corpse));
    assert_eq!(world.system::<Physics>().unwrap().steps, 1);

    world.run_system::<Physics>(0.5).unwrap();
    assert_eq!(world.get_component::<Position>(runner), Ok(&pos(2.0)));
}

#[test]
fn dead_handles_are_rejected() {
    let mut world = world_with(4);
    let e = world.create_entity().unwrap();
    world.destroy_entity(e).unwrap();

    let invalid = EcsError::InvalidEntity { entity: e };
    assert_eq!(world.add_component(e, Health(1)), Err(invalid.clone()));
    assert_eq!(world.destroy_entity(e), Err(invalid.clone()));
    assert_eq!(world.get_component::<Health>(e), Err(invalid));
    assert!(!world.has_component::<Health>(e));
}
