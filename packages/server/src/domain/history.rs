//! Conversation history: a bounded, append-only log of messages per room.

use std::collections::VecDeque;

use super::{
    entity::Message,
    value_object::MessageId,
};

/// Maximum number of messages kept per room
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Number of messages replayed to a client joining a room
pub const DEFAULT_REPLAY_LIMIT: usize = 100;

/// Result of appending a message to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Pushed to the end; `evicted` oldest messages were dropped to stay in bounds
    Appended { evicted: usize },
    /// A message with the same id existed and was replaced in place
    Replaced,
}

/// Ring-bounded message log of one conversation.
///
/// Message ids are unique within the log. Once the log exceeds its limit the
/// oldest messages are dropped from the front.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: VecDeque<Message>,
    limit: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl ConversationHistory {
    /// Create an empty log holding at most `limit` messages (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, message_id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == message_id)
    }

    /// Append a message, replacing an existing one with the same id.
    pub fn append(&mut self, message: Message) -> AppendOutcome {
        if let Some(existing) = self.messages.iter_mut().find(|m| m.id == message.id) {
            *existing = message;
            return AppendOutcome::Replaced;
        }

        self.messages.push_back(message);
        let mut evicted = 0;
        while self.messages.len() > self.limit {
            self.messages.pop_front();
            evicted += 1;
        }
        AppendOutcome::Appended { evicted }
    }

    /// Replace the content of a message and flag it as edited.
    ///
    /// Only `content` and `edited` change. Returns the updated message, or
    /// `None` when the id is unknown.
    pub fn edit_content(&mut self, message_id: &MessageId, content: String) -> Option<&Message> {
        let message = self.messages.iter_mut().find(|m| &m.id == message_id)?;
        message.content = content;
        message.edited = true;
        Some(message)
    }

    /// Remove a message by id. Returns the removed message, or `None` when the
    /// id is unknown.
    pub fn delete(&mut self, message_id: &MessageId) -> Option<Message> {
        let index = self.messages.iter().position(|m| &m.id == message_id)?;
        self.messages.remove(index)
    }

    /// The most recent `max_count` messages, oldest first.
    pub fn replay_tail(&self, max_count: usize) -> Vec<Message> {
        let skip = self.messages.len().saturating_sub(max_count);
        self.messages.iter().skip(skip).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entity::MessageStatus,
        value_object::{ConversationId, Timestamp, UserId},
    };

    fn message(id: &str, content: &str) -> Message {
        Message {
            id: MessageId::new(id.to_string()).unwrap(),
            conversation_id: ConversationId::new("r1".to_string()).unwrap(),
            sender_id: UserId::new("alice".to_string()).unwrap(),
            sender_name: "Alice".to_string(),
            sender_avatar: String::new(),
            content: content.to_string(),
            timestamp: Timestamp::new(0),
            status: MessageStatus::Sent,
            reply_to: None,
            reactions: Vec::new(),
            edited: false,
            attachments: Vec::new(),
        }
    }

    fn ids(messages: &[Message]) -> Vec<String> {
        messages.iter().map(|m| m.id.as_str().to_string()).collect()
    }

    #[test]
    fn test_history_is_bounded_to_most_recent() {
        // テスト項目: 1001 件追加すると最古の 1 件が落ち、直近 1000 件が時系列順に残る
        // given (前提条件):
        let mut history = ConversationHistory::default();

        // when (操作):
        for i in 0..1001 {
            history.append(message(&format!("m{i}"), "x"));
        }
        let tail = history.replay_tail(1000);

        // then (期待する結果):
        assert_eq!(history.len(), 1000);
        assert_eq!(tail.len(), 1000);
        assert_eq!(tail[0].id.as_str(), "m1");
        assert_eq!(tail[999].id.as_str(), "m1000");
        assert!(history.get(&MessageId::new("m0".to_string()).unwrap()).is_none());
    }

    #[test]
    fn test_append_reports_eviction() {
        // テスト項目: 上限を超えた追加で追い出された件数が返される
        // given (前提条件):
        let mut history = ConversationHistory::with_limit(2);
        history.append(message("m1", "a"));
        history.append(message("m2", "b"));

        // when (操作):
        let outcome = history.append(message("m3", "c"));

        // then (期待する結果):
        assert_eq!(outcome, AppendOutcome::Appended { evicted: 1 });
        assert_eq!(ids(&history.replay_tail(10)), vec!["m2", "m3"]);
    }

    #[test]
    fn test_append_with_existing_id_replaces_in_place() {
        // テスト項目: 既存 ID の追加は同じ位置で置き換えられ、件数は変わらない
        // given (前提条件):
        let mut history = ConversationHistory::default();
        history.append(message("m1", "first"));
        history.append(message("m2", "second"));
        history.append(message("m3", "third"));

        // when (操作):
        let outcome = history.append(message("m2", "second (redelivered)"));

        // then (期待する結果):
        assert_eq!(outcome, AppendOutcome::Replaced);
        assert_eq!(history.len(), 3);
        let tail = history.replay_tail(10);
        assert_eq!(ids(&tail), vec!["m1", "m2", "m3"]);
        assert_eq!(tail[1].content, "second (redelivered)");
    }

    #[test]
    fn test_edit_content_marks_edited_and_keeps_other_fields() {
        // テスト項目: 編集は content と edited のみを変更する
        // given (前提条件):
        let mut history = ConversationHistory::default();
        let mut original = message("m1", "hi");
        original.sender_name = "Alice".to_string();
        original.reply_to = Some(MessageId::new("m0".to_string()).unwrap());
        history.append(original.clone());

        // when (操作):
        let edited = history
            .edit_content(&original.id, "hi edited".to_string())
            .cloned();

        // then (期待する結果):
        let edited = edited.unwrap();
        assert_eq!(edited.content, "hi edited");
        assert!(edited.edited);
        assert_eq!(edited.sender_name, original.sender_name);
        assert_eq!(edited.reply_to, original.reply_to);
        assert_eq!(edited.timestamp, original.timestamp);
    }

    #[test]
    fn test_edit_missing_id_is_noop() {
        // テスト項目: 存在しない ID の編集は履歴を変更しない
        // given (前提条件):
        let mut history = ConversationHistory::default();
        history.append(message("m1", "hi"));

        // when (操作):
        let result = history.edit_content(
            &MessageId::new("missing".to_string()).unwrap(),
            "nope".to_string(),
        );

        // then (期待する結果):
        assert!(result.is_none());
        assert_eq!(history.len(), 1);
        assert_eq!(history.replay_tail(1)[0].content, "hi");
        assert!(!history.replay_tail(1)[0].edited);
    }

    #[test]
    fn test_delete_removes_by_id() {
        // テスト項目: ID 指定で削除でき、存在しない ID の削除は何もしない
        // given (前提条件):
        let mut history = ConversationHistory::default();
        history.append(message("m1", "a"));
        history.append(message("m2", "b"));

        // when (操作):
        let removed = history.delete(&MessageId::new("m1".to_string()).unwrap());
        let missing = history.delete(&MessageId::new("m1".to_string()).unwrap());

        // then (期待する結果):
        assert_eq!(removed.map(|m| m.content), Some("a".to_string()));
        assert!(missing.is_none());
        assert_eq!(ids(&history.replay_tail(10)), vec!["m2"]);
    }

    #[test]
    fn test_replay_tail_on_short_and_empty_logs() {
        // テスト項目: 件数が少ない場合は全件、空の場合は空を返す
        // given (前提条件):
        let empty = ConversationHistory::default();
        let mut short = ConversationHistory::default();
        for i in 0..5 {
            short.append(message(&format!("m{i}"), "x"));
        }

        // then (期待する結果):
        assert!(empty.replay_tail(DEFAULT_REPLAY_LIMIT).is_empty());
        assert_eq!(
            ids(&short.replay_tail(DEFAULT_REPLAY_LIMIT)),
            vec!["m0", "m1", "m2", "m3", "m4"]
        );
        assert_eq!(ids(&short.replay_tail(2)), vec!["m3", "m4"]);
    }

    #[test]
    fn test_with_limit_clamps_zero() {
        // テスト項目: 上限 0 は 1 に補正される
        let history = ConversationHistory::with_limit(0);

        assert_eq!(history.limit(), 1);
    }
}
