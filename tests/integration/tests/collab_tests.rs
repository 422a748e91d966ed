//! End-to-end tests over real sockets
//!
//! Each test starts its own in-process server and drives one or more clients
//! against it with the WebSocket transport and the HTTP repositories.

use std::time::Duration;

use anyhow::Result;
use collab_client::protocol::CloseCode;
use collab_client::{ConnectionState, LoadState, SessionEvent};
use collab_common::CollabError;
use collab_core::{
    DomainError, EntityId, EntityRepository, MessageDraft, Note, NoteDraft, NotePatch,
    PresenceStatus, RoomId, SubtaskDraft, UserId,
};
use integration_tests::{
    assert_json, assert_status, eventually, message, note, subtask, token_for, unique_id,
    TestGateway,
};
use reqwest::StatusCode;

fn users(names: &[&str]) -> Vec<UserId> {
    names.iter().map(|name| UserId::from(*name)).collect()
}

fn sorted(mut users: Vec<UserId>) -> Vec<UserId> {
    users.sort();
    users
}

// ============================================================================
// Ticket collaboration
// ============================================================================

#[tokio::test]
async fn test_ticket_mount_loads_and_joins() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let ticket_id = unique_id();
    gateway.state.insert_note(note(1, ticket_id, "B", "first"));
    gateway.state.insert_note(note(5, ticket_id + 1000, "B", "elsewhere"));
    gateway.state.insert_subtask(subtask(2, ticket_id, "write tests", 0));

    let client = gateway.client("A")?;
    let _handle = client.start().await?;
    let ticket = client.mount_ticket(EntityId::new(ticket_id));

    assert_eq!(ticket.loaded().await, LoadState::Ready);
    assert!(ticket.is_joined());
    assert_eq!(ticket.notes().len(), 1);
    assert_eq!(ticket.notes()[0].body, "first");
    assert_eq!(ticket.subtasks()[0].title, "write tests");
    assert_eq!(ticket.active_users(), users(&["A"]));
    assert_eq!(
        gateway.state.room_members(RoomId::ticket(ticket_id)),
        users(&["A"])
    );
    Ok(())
}

#[tokio::test]
async fn test_note_writes_arrive_through_events() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let ticket_id = unique_id();
    let client = gateway.client("A")?;
    let _handle = client.start().await?;
    let ticket = client.mount_ticket(EntityId::new(ticket_id));
    ticket.loaded().await;

    let created = ticket.create_note(NoteDraft::new("second")).await?;
    assert_eq!(created.author_id, UserId::from("A"));
    eventually("created note", || ticket.note(created.id).is_some()).await?;

    let patch = NotePatch {
        body: Some("edited".to_string()),
        ..NotePatch::default()
    };
    ticket.update_note(created.id, patch).await?;
    eventually("edited note", || {
        ticket.note(created.id).is_some_and(|n| n.body == "edited")
    })
    .await?;

    ticket.toggle_note_reaction(created.id, "👍").await?;
    eventually("reaction added", || {
        ticket
            .note(created.id)
            .is_some_and(|n| n.reactions.iter().any(|r| r.includes(&UserId::from("A"))))
    })
    .await?;

    ticket.toggle_note_reaction(created.id, "👍").await?;
    eventually("reaction removed", || {
        ticket
            .note(created.id)
            .is_some_and(|n| n.reactions.is_empty())
    })
    .await?;

    ticket.delete_note(created.id).await?;
    eventually("deleted note", || ticket.note(created.id).is_none()).await?;
    assert!(ticket.notes().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_checklist_changes_are_mirrored() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let ticket_id = unique_id();
    gateway.state.insert_subtask(subtask(2, ticket_id, "review", 0));

    let client = gateway.client("A")?;
    let _handle = client.start().await?;
    let ticket = client.mount_ticket(EntityId::new(ticket_id));
    ticket.loaded().await;

    let added = ticket.add_subtask(SubtaskDraft::new("ship it")).await?;
    assert_eq!(added.position, 1);
    eventually("added subtask", || ticket.subtask(added.id).is_some()).await?;

    ticket.toggle_subtask(EntityId::new(2)).await?;
    eventually("completed subtask", || {
        ticket
            .subtask(EntityId::new(2))
            .is_some_and(|s| s.completed)
    })
    .await?;

    ticket.delete_subtask(added.id).await?;
    eventually("deleted subtask", || ticket.subtask(added.id).is_none()).await?;
    assert_eq!(ticket.subtasks().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_other_clients_writes_are_seen() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let ticket_id = unique_id();

    let alice = gateway.client("A")?;
    let _alice_handle = alice.start().await?;
    let watching = alice.mount_ticket(EntityId::new(ticket_id));
    watching.loaded().await;

    let bob = gateway.client("B")?;
    let _bob_handle = bob.start().await?;
    let writing = bob.mount_ticket(EntityId::new(ticket_id));
    writing.loaded().await;

    let created = writing.create_note(NoteDraft::new("from bob")).await?;
    eventually("note seen by the other client", || {
        watching
            .note(created.id)
            .is_some_and(|n| n.author_id == UserId::from("B"))
    })
    .await?;
    Ok(())
}

#[tokio::test]
async fn test_rejected_join_keeps_loaded_lists() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let ticket_id = unique_id();
    gateway.state.insert_note(note(1, ticket_id, "B", "first"));
    gateway.state.deny_join(RoomId::ticket(ticket_id));

    let client = gateway.client("A")?;
    let _handle = client.start().await?;
    let ticket = client.mount_ticket(EntityId::new(ticket_id));

    assert_eq!(ticket.loaded().await, LoadState::Ready);
    assert!(!ticket.is_joined());
    assert_eq!(ticket.notes().len(), 1);
    assert!(gateway
        .state
        .room_members(RoomId::ticket(ticket_id))
        .is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unmount_leaves_room() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let ticket_id = unique_id();
    let room = RoomId::ticket(ticket_id);

    let client = gateway.client("A")?;
    let _handle = client.start().await?;
    let ticket = client.mount_ticket(EntityId::new(ticket_id));
    ticket.loaded().await;
    assert!(client.ledger().has_room(room));

    ticket.unmount().await;

    assert!(!ticket.is_mounted());
    assert!(!client.ledger().has_room(room));
    eventually("server-side leave", || {
        gateway.state.room_members(room).is_empty()
    })
    .await?;
    assert!(client.session().joined_rooms().is_empty());
    Ok(())
}

// ============================================================================
// Team rooms and presence
// ============================================================================

#[tokio::test]
async fn test_presence_between_two_clients() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let team_id = unique_id();
    let room = RoomId::team(team_id);

    let alice = gateway.client("A")?;
    let _alice_handle = alice.start().await?;
    let alice_room = alice.mount_team(EntityId::new(team_id));
    alice_room.loaded().await;

    let bob = gateway.client("B")?;
    let _bob_handle = bob.start().await?;
    let bob_room = bob.mount_team(EntityId::new(team_id));
    bob_room.loaded().await;
    assert_eq!(sorted(bob_room.active_users()), users(&["A", "B"]));

    eventually("bob joins alice's view", || {
        sorted(alice_room.active_users()) == users(&["A", "B"])
    })
    .await?;

    bob_room.handle_typing();
    eventually("bob typing", || alice_room.typing_users() == users(&["B"])).await?;
    assert!(bob_room.typing_users().is_empty());

    // The idle timer sends the stop
    eventually("bob idle", || alice_room.typing_users().is_empty()).await?;
    let emits = gateway.state.emits();
    assert!(emits.contains(&format!("typing_start {room}")));
    assert!(emits.contains(&format!("typing_stop {room}")));

    bob_room.set_status(PresenceStatus::Away)?;
    eventually("bob away", || {
        alice.ledger().status_of(&UserId::from("B")) == PresenceStatus::Away
    })
    .await?;

    bob_room.unmount().await;
    eventually("bob leaves alice's view", || {
        alice_room.active_users() == users(&["A"])
    })
    .await?;
    Ok(())
}

#[tokio::test]
async fn test_team_messages_round_trip() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let team_id = unique_id();
    gateway.state.insert_message(message(1, team_id, "B", "hello"));

    let alice = gateway.client("A")?;
    let _alice_handle = alice.start().await?;
    let alice_room = alice.mount_team(EntityId::new(team_id));
    alice_room.loaded().await;
    assert_eq!(alice_room.messages().len(), 1);

    let bob = gateway.client("B")?;
    let _bob_handle = bob.start().await?;
    let bob_room = bob.mount_team(EntityId::new(team_id));
    bob_room.loaded().await;

    let sent = alice_room.send_message(MessageDraft::new("hi bob")).await?;
    eventually("message on both sides", || {
        alice_room.messages().len() == 2 && bob_room.messages().len() == 2
    })
    .await?;

    bob_room.toggle_reaction(sent.id, "🎉").await?;
    eventually("reaction seen by author", || {
        alice_room
            .messages()
            .iter()
            .any(|m| m.id == sent.id && m.reactions.len() == 1)
    })
    .await?;

    alice_room.delete_message(sent.id).await?;
    eventually("message deleted on both sides", || {
        alice_room.messages().len() == 1 && bob_room.messages().len() == 1
    })
    .await?;
    Ok(())
}

#[tokio::test]
async fn test_two_rooms_share_one_connection() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let client = gateway.client("A")?;
    let _handle = client.start().await?;

    let ticket = client.mount_ticket(EntityId::new(unique_id()));
    let team = client.mount_team(EntityId::new(unique_id()));
    ticket.loaded().await;
    team.loaded().await;

    assert_eq!(gateway.state.identified(), 1);
    assert_eq!(gateway.state.connection_count(), 1);
    assert_eq!(client.session().joined_rooms().len(), 2);
    Ok(())
}

// ============================================================================
// Connection lifecycle
// ============================================================================

#[tokio::test]
async fn test_invalid_token_is_terminal() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let client = gateway.client("")?;

    let result = client.start().await;

    assert!(matches!(result, Err(CollabError::AuthRejected)));
    assert_eq!(client.session().state(), ConnectionState::Disconnected);
    assert_eq!(gateway.state.identified(), 0);
    Ok(())
}

#[tokio::test]
async fn test_reconnect_rejoins_rooms() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let ticket_id = unique_id();
    let room = RoomId::ticket(ticket_id);

    let client = gateway.client("A")?;
    let mut lifecycle = client.session().subscribe_lifecycle();
    let _handle = client.start().await?;
    let ticket = client.mount_ticket(EntityId::new(ticket_id));
    ticket.loaded().await;

    gateway.state.close_all(CloseCode::UnknownError.as_u16());

    let rejoined = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match lifecycle.recv().await {
                Ok(SessionEvent::Rejoined { room: r, .. }) if r == room => return true,
                Ok(_) => {}
                Err(_) => return false,
            }
        }
    })
    .await?;
    assert!(rejoined);
    assert_eq!(gateway.state.identified(), 2);
    assert_eq!(gateway.state.room_members(room), users(&["A"]));

    // Events keep flowing on the new connection
    let created = ticket.create_note(NoteDraft::new("after reconnect")).await?;
    eventually("note after reconnect", || ticket.note(created.id).is_some()).await?;
    Ok(())
}

#[tokio::test]
async fn test_auth_close_stops_reconnecting() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let client = gateway.client("A")?;
    let _handle = client.start().await?;

    gateway
        .state
        .close_all(CloseCode::AuthenticationFailed.as_u16());

    eventually("session down", || {
        client.session().state() == ConnectionState::Disconnected
    })
    .await?;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(gateway.state.identified(), 1);
    assert!(client
        .session()
        .last_error()
        .is_some_and(|e| e.is_terminal()));
    Ok(())
}

// ============================================================================
// REST
// ============================================================================

#[tokio::test]
async fn test_rest_errors_map_to_domain_errors() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let room = RoomId::ticket(unique_id());

    let anonymous = gateway.rest("not-a-token")?.repository::<Note>();
    let err = anonymous.list(room).await.unwrap_err();
    assert!(err.is_authorization());

    let notes = gateway.rest(&token_for("A"))?.repository::<Note>();
    let err = notes
        .update(room, EntityId::new(424_242), &NotePatch::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::NotFound {
            kind: "note",
            id: EntityId::new(424_242)
        }
    );

    let err = notes
        .create(room, &NoteDraft::new("   "))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    Ok(())
}

#[tokio::test]
async fn test_rest_routes_require_bearer_token() -> Result<()> {
    let gateway = TestGateway::start().await?;
    let ticket_id = unique_id();
    gateway.state.insert_note(note(1, ticket_id, "B", "first"));
    let path = format!("/tickets/{ticket_id}/notes");

    let response = gateway.get_auth(&path, "bogus").await?;
    assert_status(response, StatusCode::UNAUTHORIZED).await?;

    let response = gateway.get_auth(&path, &token_for("A")).await?;
    let notes: Vec<Note> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(notes.len(), 1);
    Ok(())
}
