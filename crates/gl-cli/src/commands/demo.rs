//! A scripted evening at the table, played against the in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use gl_mechanics::catalog::find_item;
use gl_mechanics::{DiceNotation, SanityLedger};
use gl_table::{
    AuthState, MemoryBackend, MemoryIdentity, PartyUpdate, PartyView, PinKind, Recipient, Role,
    RollRequest, SessionBus, SessionEvent, Subscription, TableConfig, TableError, TableService,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::create::{Blueprint, generate};

pub fn run(seed: u64) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start runtime: {e}"))?;
    runtime.block_on(play(seed))
}

fn step(text: &str) {
    println!("  {} {text}", "»".dimmed());
}

fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::StatusUpdate { madness, major_wound, .. } => {
            format!("status update ({madness}, major wound: {major_wound})")
        }
        SessionEvent::RefreshSession => "refresh session".to_string(),
        SessionEvent::PlaySound { sound, .. } => format!("play sound '{sound}'"),
        SessionEvent::MasterVolumeChange { volume } => format!("master volume {volume:.2}"),
        SessionEvent::AmbianceChange { lights_out, scene_mode, .. } => {
            format!("ambiance (lights out: {lights_out}, {scene_mode})")
        }
        SessionEvent::RollRequested { .. } => "roll requested".to_string(),
        SessionEvent::Resync => "resync".to_string(),
    }
}

/// Apply whatever the bus has queued to the Keeper's party view.
async fn drain(
    sub: &mut Subscription,
    party: &mut PartyView,
    service: &TableService,
) -> Result<(), String> {
    let e = |e: TableError| e.to_string();
    while let Ok(Some(envelope)) = tokio::time::timeout(Duration::from_millis(20), sub.recv()).await
    {
        println!(
            "    {} {}",
            format!("#{}", envelope.seq).dimmed(),
            describe(&envelope.event)
        );
        let update = party.apply(&envelope);
        tracing::debug!(seq = envelope.seq, ?update, "party view");
        if update == PartyUpdate::NeedsRefresh {
            party.refresh(&service.party(envelope.session_id).await.map_err(e)?);
        }
    }
    Ok(())
}

async fn play(seed: u64) -> Result<(), String> {
    let e = |e: TableError| e.to_string();
    let mut rng = StdRng::seed_from_u64(seed);
    let config = TableConfig::from_env().map_err(e)?;

    let identity = Arc::new(MemoryIdentity::new());
    let keeper_auth = AuthState::new(identity.clone(), &config);
    let player_auth = AuthState::new(identity, &config);
    let bus = Arc::new(SessionBus::new(&config));
    let service = TableService::new(Arc::new(MemoryBackend::new()), bus, config);

    let keeper = keeper_auth
        .register("Keeper", "elder-sign", Role::Keeper)
        .await
        .map_err(e)?;
    let player = player_auth
        .register("Harvey", "tillinghast", Role::Investigator)
        .await
        .map_err(e)?;
    step(&format!("{} and {} signed in", keeper.email, player.email));

    let mut character = generate(
        &Blueprint {
            name: Some("Harvey Walters"),
            occupation: Some("journalist"),
            age: Some(42),
            owner: Some(player.id),
        },
        &mut rng,
    )?;
    service.save_character(&character).await.map_err(e)?;

    let keeper = keeper_auth.require_keeper().await.map_err(e)?;
    let session = service
        .create_session(&keeper, "The Haunting", &mut rng)
        .await
        .map_err(e)?;
    step(&format!(
        "Keeper opened '{}' with invite code {}",
        session.name,
        session.invite_code.bold()
    ));

    let mut sub = service.bus().subscribe(session.id).await;
    let mut party = PartyView::new(session.id);

    let on_file = service.characters_of(&player).await.map_err(e)?;
    step(&format!(
        "{} has {} investigator(s) on file",
        player.username,
        on_file.len()
    ));
    service
        .join_session(&player, &session.invite_code, character.id)
        .await
        .map_err(e)?;
    step(&format!("{} joined the table", character.name));
    drain(&mut sub, &mut party, &service).await?;

    let target = character.target_for("Spot Hidden");
    let request = RollRequest::new(
        session.id,
        character.id,
        "Spot Hidden",
        target,
        DiceNotation::d100(),
    );
    let request = service.request_roll(&keeper, request).await.map_err(e)?;
    step(&format!("Keeper asks for Spot Hidden ({target})"));
    drain(&mut sub, &mut party, &service).await?;

    let pending = service
        .visible_roll_requests(session.id, Utc::now())
        .await
        .map_err(e)?;
    step(&format!("{} request(s) on the player's screen", pending.len()));
    let rolled = service
        .resolve_roll_request(&player, request.id, &mut rng)
        .await
        .map_err(e)?;
    if let (Some(result), Some(outcome)) = (rolled.result, rolled.outcome) {
        step(&format!("{} rolls {result}: {outcome}", character.name));
    }

    service
        .set_lights(&keeper, session.id, true)
        .await
        .map_err(e)?;
    service
        .play_sound(&keeper, session.id, "thunder", Recipient::All)
        .await
        .map_err(e)?;
    step("the lights go out");
    drain(&mut sub, &mut party, &service).await?;

    if let Some(lantern) = find_item("lantern") {
        let given = service
            .give_item(&keeper, session.id, character.id, lantern, Utc::now())
            .await
            .map_err(e)?;
        step(&format!("Keeper hands over a {}", given.item.name));
    }
    drain(&mut sub, &mut party, &service).await?;

    character = service.character(character.id).await.map_err(e)?;
    let mut ledger = SanityLedger::begin_day(&character);
    let outcome = ledger.lose(&mut character, 6);
    service.save_character(&character).await.map_err(e)?;
    step(&format!(
        "something moves in the dark: {} loses {} SAN",
        character.name, outcome.lost
    ));
    service
        .set_status(&keeper, session.id, character.id, character.status)
        .await
        .map_err(e)?;
    drain(&mut sub, &mut party, &service).await?;

    service
        .pin(
            &player,
            session.id,
            PinKind::Note,
            "The cellar door was locked from the inside.",
            120.0,
            80.0,
        )
        .await
        .map_err(e)?;
    let pins = service.pins(session.id).await.map_err(e)?;
    step(&format!("{} note(s) on the pinboard", pins.len()));

    // Status updates only carry flags; pick up the new sanity too.
    party.refresh(&service.party(session.id).await.map_err(e)?);

    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Investigator", "HP", "SAN", "MP", "State"]);
    for member in party.members() {
        let mut state = member.status.madness.to_string();
        if member.status.major_wound {
            state.push_str(", major wound");
        }
        table.add_row(vec![
            member.name.clone(),
            member.hit_points.to_string(),
            member.sanity.to_string(),
            member.magic_points.to_string(),
            state,
        ]);
    }
    println!("{table}");

    service.close_session(&keeper, session.id).await.map_err(e)?;
    step("Keeper closed the table");
    player_auth.logout().await.map_err(e)?;
    keeper_auth.logout().await.map_err(e)?;
    Ok(())
}
