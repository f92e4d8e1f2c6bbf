use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::action::{Action, PlayChoice, PlayOutcome, PlayerId, ZeroChoice};
use crate::card::{Card, Color, PLAYABLE_COLORS, PLAYER_COUNT, Value};
use crate::deck::Deck;
use crate::error::{GameError, InvalidAction};
use crate::manager::{DamageTypes, GameManager};
use crate::player::Player;
use crate::policy::{GameEnd, GameMode, ModePolicy};
use crate::random::{pick_color, pick_face};
use crate::schedule::Scheduler;
use crate::score::{settle_round, standings};
use crate::state::{
    DEFAULT_HAND_SIZE, DEFAULT_HP, DEFAULT_SCORE_GOAL, GameSettings, GameStateView, GameStatus,
    PlayerPublicState, TurnPhase,
};

const DEFAULT_SEED: u64 = 0x5EED_C0DE_5EED_C0DE;

/// Seat of the human player; Death-Match ends when this seat is knocked out.
pub const HOST_SEAT: PlayerId = 0;
/// Ticks an AI seat "thinks" before its play resolves.
pub const AI_THINK_TICKS: u64 = 30;
/// Ticks between the notifications of cards swept by a discard-all.
pub const SWEEP_STAGGER_TICKS: u64 = 10;
/// Damage banked by a zero card.
pub const ZERO_BANK: u32 = 10;
/// Below this pool size the AI always banks a zero.
pub const ZERO_SAFE_POOL: u32 = 30;
/// Cards forced on every opponent by a wild hit-all.
pub const HIT_ALL_DRAW: usize = 2;

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    pub mode: GameMode,
    pub seed: u64,
    pub initial_hand: usize,
    pub initial_hp: u32,
    pub score_goal: u32,
    pub extra_cards: bool,
    /// Seat 0 is driven by the built-in AI as well.
    pub all_ai: bool,
}

impl GameConfig {
    pub fn new(mode: GameMode, seed: u64) -> Self {
        Self {
            mode,
            seed,
            initial_hand: DEFAULT_HAND_SIZE,
            initial_hp: DEFAULT_HP,
            score_goal: DEFAULT_SCORE_GOAL,
            extra_cards: true,
            all_ai: false,
        }
    }

    pub fn settings(&self) -> Result<GameSettings, GameError> {
        GameSettings::new(
            self.mode,
            self.initial_hand,
            self.initial_hp,
            self.score_goal,
            self.extra_cards,
        )
    }
}

/// Builder that enables deterministic deck injection for testing and simulations.
pub struct GameBuilder {
    config: GameConfig,
    deck: Option<Vec<Card>>,
}

impl GameBuilder {
    pub fn new(mode: GameMode) -> Self {
        Self {
            config: GameConfig::new(mode, DEFAULT_SEED),
            deck: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Card order for the first round; the last card is the top of the draw pile.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    pub fn with_initial_hand(mut self, cards: usize) -> Self {
        self.config.initial_hand = cards;
        self
    }

    pub fn with_initial_hp(mut self, hp: u32) -> Self {
        self.config.initial_hp = hp;
        self
    }

    pub fn with_score_goal(mut self, goal: u32) -> Self {
        self.config.score_goal = goal;
        self
    }

    pub fn without_extra_cards(mut self) -> Self {
        self.config.extra_cards = false;
        self
    }

    pub fn with_all_ai(mut self) -> Self {
        self.config.all_ai = true;
        self
    }

    pub fn build(self) -> Result<PunoGame, GameError> {
        PunoGame::from_builder(self)
    }
}

#[derive(Clone, Copy, Debug)]
enum Task {
    AiTurn(PlayerId),
    Sweep { player: PlayerId, card: Card },
}

/// Side effect of an action card, folded into the play outcome.
enum CardEffect {
    None,
    Trade(Option<PlayerId>),
    Swept(usize),
}

/// Four-seat turn engine.
pub struct PunoGame {
    settings: GameSettings,
    policy: ModePolicy,
    players: Vec<Player>,
    deck: Deck,
    preset_deck: Option<Vec<Card>>,
    universe: usize,
    current_player: PlayerId,
    clockwise: bool,
    current_color: Color,
    current_value: Value,
    penalty_card: Option<Card>,
    penalty_pool: usize,
    damage_pool: u32,
    damage_types: DamageTypes,
    phase: TurnPhase,
    status: GameStatus,
    round: u32,
    turns: u64,
    ai_thinking: bool,
    awaiting_user: Option<PlayerId>,
    scheduler: Scheduler<Task>,
    rng: StdRng,
}

impl PunoGame {
    pub fn builder(mode: GameMode) -> GameBuilder {
        GameBuilder::new(mode)
    }

    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        GameBuilder { config, deck: None }.build()
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder { config, deck } = builder;
        let settings = config.settings()?;
        if let Some(deck) = &deck {
            if deck.len() < settings.required_cards() {
                return Err(GameError::InvalidConfiguration(
                    "deck does not contain enough cards to deal",
                ));
            }
        }
        let hp = settings.initial_hp;
        let players = vec![
            Player::new("User", hp, config.all_ai),
            Player::new("CPU1", hp, true),
            Player::new("CPU2", hp, true),
            Player::new("CPU3", hp, true),
        ];
        Ok(Self {
            settings,
            policy: settings.mode.policy(),
            players,
            deck: Deck::from_cards(Vec::new()),
            preset_deck: deck,
            universe: 0,
            current_player: HOST_SEAT,
            clockwise: true,
            current_color: Color::Red,
            current_value: Value::Zero,
            penalty_card: None,
            penalty_pool: 0,
            damage_pool: 0,
            damage_types: DamageTypes::new(),
            phase: TurnPhase::Idle,
            status: GameStatus::Ongoing,
            round: 0,
            turns: 0,
            ai_thinking: false,
            awaiting_user: None,
            scheduler: Scheduler::new(),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn mode(&self) -> GameMode {
        self.settings.mode
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turns(&self) -> u64 {
        self.turns
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn clockwise(&self) -> bool {
        self.clockwise
    }

    pub fn current_color(&self) -> Color {
        self.current_color
    }

    pub fn current_value(&self) -> Value {
        self.current_value
    }

    pub fn penalty_card(&self) -> Option<Card> {
        self.penalty_card
    }

    pub fn penalty_pool(&self) -> usize {
        self.penalty_pool
    }

    pub fn damage_pool(&self) -> u32 {
        self.damage_pool
    }

    pub fn damage_types(&self) -> &DamageTypes {
        &self.damage_types
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn is_ai_thinking(&self) -> bool {
        self.ai_thinking
    }

    /// Seat whose decision the engine is waiting for.
    pub fn awaiting_user(&self) -> Option<PlayerId> {
        self.awaiting_user
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::Finished { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            GameStatus::Finished { winner } => Some(winner),
            GameStatus::Ongoing => None,
        }
    }

    /// Cards in the current round's universe.
    pub fn universe(&self) -> usize {
        self.universe
    }

    /// Cards currently accounted for across draw pile, discard pile and hands.
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.deck.discard_pile().len()
            + self.players.iter().map(|p| p.hand.len()).sum::<usize>()
    }

    pub fn standings(&self) -> Vec<PlayerId> {
        standings(self.policy.scoring, &self.players)
    }

    pub fn state_view(&self, perspective: PlayerId) -> Result<GameStateView, GameError> {
        if perspective >= self.players.len() {
            return Err(GameError::InvalidPlayer(perspective));
        }
        let players = self
            .players
            .iter()
            .enumerate()
            .map(|(idx, player)| PlayerPublicState {
                id: idx,
                name: player.name.clone(),
                hp: player.hp,
                score: player.score,
                hand_size: player.hand.len(),
                knocked_out: player.knocked_out,
                ai: player.ai,
                uno: player.uno,
                damage_stack: player.damage_stack,
                is_current: idx == self.current_player,
            })
            .collect();
        Ok(GameStateView {
            settings: self.settings,
            phase: self.phase,
            status: self.status,
            round: self.round,
            self_player: perspective,
            current_player: self.current_player,
            next_player: self.next_alive_player_index(self.current_player),
            clockwise: self.clockwise,
            current_color: self.current_color,
            current_value: self.current_value,
            top_card: self.deck.top(),
            penalty_card: self.penalty_card,
            penalty_pool: self.penalty_pool,
            damage_pool: self.damage_pool,
            damage_types: self.damage_types.clone(),
            draw_pile_count: self.deck.len(),
            discard_pile_count: self.deck.discard_pile().len(),
            players,
            hand: self.players[perspective].hand.clone(),
        })
    }

    /// Begin the game and deal the first round.
    pub fn start(&mut self, mgr: &mut dyn GameManager) {
        info!(mode = ?self.settings.mode, goal = self.settings.score_goal, "game start");
        mgr.on_game_start();
        self.start_round(mgr);
    }

    fn start_round(&mut self, mgr: &mut dyn GameManager) {
        self.initialize(mgr);
        mgr.on_round_start();
    }

    /// Fresh deck, reset players, dealer selection, initial deal and opening card.
    pub fn initialize(&mut self, mgr: &mut dyn GameManager) {
        self.round += 1;
        info!(round = self.round, "initialize");
        self.init_deck();
        self.init_players();
        self.current_player = self.choose_dealer(mgr);
        self.process_first_deal(mgr);
        self.draw_first_card(mgr);
        self.phase = TurnPhase::Playing;
    }

    fn init_deck(&mut self) {
        self.deck = match self.preset_deck.take() {
            Some(cards) => Deck::from_cards(cards),
            None => Deck::new(self.settings.extra_cards, &mut self.rng),
        };
        self.universe = self.deck.len();
    }

    fn init_players(&mut self) {
        for player in &mut self.players {
            player.reset(self.settings.initial_hp);
        }
        self.clockwise = true;
        self.penalty_card = None;
        self.penalty_pool = 0;
        self.damage_pool = 0;
        self.damage_types.clear();
        self.ai_thinking = false;
        self.awaiting_user = None;
    }

    /// Peek one card per seat until a single highest value emerges.
    ///
    /// Bounded by the deck size: once every card has been peeked, the first tied seat wins.
    fn choose_dealer(&mut self, mgr: &mut dyn GameManager) -> PlayerId {
        let attempts = (self.deck.len() / PLAYER_COUNT).max(1);
        for attempt in 1..=attempts {
            let peek = self.deck.draw_numbered(PLAYER_COUNT);
            if peek.is_empty() {
                break;
            }
            let (highest, unique) = highest_seat(&peek);
            if unique || attempt == attempts {
                for (seat, card) in peek.iter().enumerate() {
                    debug!(player = %self.players[seat].name, %card, "dealer draw");
                    mgr.on_card_draw(seat, std::slice::from_ref(card), true);
                }
                self.deck.putback(peek);
                return highest;
            }
            debug!("deadlock => redraw");
            self.deck.putback(peek);
        }
        HOST_SEAT
    }

    fn process_first_deal(&mut self, mgr: &mut dyn GameManager) {
        for seat in 0..PLAYER_COUNT {
            self.draw_for(seat, self.settings.initial_hand, mgr);
        }
    }

    fn draw_first_card(&mut self, mgr: &mut dyn GameManager) {
        let Some(first) = self.deck.draw_colored(1).pop() else {
            tracing::warn!("no coloured card left for the opening discard");
            return;
        };
        self.deck.push_discard(first);
        self.current_color = first.color;
        self.current_value = first.value;
        match first.value {
            Value::Skip | Value::DrawTwo => {
                self.penalty_card = Some(first);
                self.penalty_pool = first.penalty_draw();
            }
            Value::Reverse => self.reverse(),
            _ => {}
        }
        debug!(card = %first, "first card");
        mgr.on_card_play(None, first, &PlayOutcome::Opening);
    }

    /// Advance one tick of the cooperative loop.
    pub fn update(&mut self, mgr: &mut dyn GameManager) {
        // Clock stops while the scene is busy.
        if mgr.is_scene_busy() {
            return;
        }
        for task in self.scheduler.advance() {
            self.run_task(task, mgr);
        }
        if matches!(self.phase, TurnPhase::Idle | TurnPhase::GameOver) {
            return;
        }
        if self.ai_thinking
            || self.awaiting_user.is_some()
            || self.scheduler.has_pending()
        {
            return;
        }
        if self.phase == TurnPhase::RoundOver {
            self.start_round(mgr);
            return;
        }
        if self.is_round_over() {
            self.process_result(mgr);
            return;
        }
        if mgr.is_in_turn() {
            self.end_turn(mgr);
            return;
        }
        self.begin_turn(mgr);
    }

    fn run_task(&mut self, task: Task, mgr: &mut dyn GameManager) {
        match task {
            Task::AiTurn(player) => {
                self.ai_thinking = false;
                if self.phase != TurnPhase::Playing
                    || self.current_player != player
                    || self.players[player].knocked_out
                {
                    return;
                }
                let action = self.ai_action();
                debug!(player, ?action, "ai action");
                self.resolve(action, mgr);
            }
            Task::Sweep { player, card } => {
                mgr.on_card_play(Some(player), card, &PlayOutcome::Swept);
            }
        }
    }

    fn begin_turn(&mut self, mgr: &mut dyn GameManager) {
        let current = self.current_player;
        if self.players[current].knocked_out {
            debug!(player = %self.players[current].name, "knocked out - skip");
            self.current_player = self.next_index(current);
            return;
        }
        self.prepare_turn(current, mgr);
        if self.players[current].knocked_out || self.is_round_over() {
            return;
        }
        if self.players[current].ai {
            mgr.on_npc_turn_begin(current);
            self.ai_thinking = true;
            self.scheduler
                .schedule_after(Task::AiTurn(current), AI_THINK_TICKS);
        } else {
            mgr.on_user_turn_begin(current);
            self.awaiting_user = Some(current);
        }
    }

    /// Death-Match turn-start bookkeeping: refill short hands, punish hoarding.
    fn prepare_turn(&mut self, current: PlayerId, mgr: &mut dyn GameManager) {
        let player = &self.players[current];
        debug!(
            player = %player.name,
            hp = player.hp,
            hand = ?player.hand,
            color = ?self.current_color,
            value = ?self.current_value,
            "turn"
        );
        if self.policy.refill_hand {
            let missing = self
                .settings
                .initial_hand
                .saturating_sub(self.players[current].hand.len());
            if missing > 0 {
                debug!(missing, "death match draw");
                self.draw_for(current, missing, mgr);
            }
        }
        if self.policy.overflow_damage && !self.players[current].knocked_out {
            self.process_player_extra_damage(current, mgr);
        }
    }

    /// Legal actions for `player`, who must be the acting seat.
    pub fn legal_actions(&self, player: PlayerId) -> Result<Vec<Action>, GameError> {
        if self.phase != TurnPhase::Playing {
            return Ok(Vec::new());
        }
        if player >= self.players.len() {
            return Err(GameError::InvalidPlayer(player));
        }
        if player != self.current_player {
            return Err(GameError::NotPlayersTurn);
        }
        let mut actions = Vec::new();
        for (hand_index, card) in self.players[player].hand.iter().enumerate() {
            if self.is_card_playable(card) {
                for choice in self.choices_for(card) {
                    actions.push(Action::Play { hand_index, choice });
                }
            }
        }
        if self.penalty_card.is_some() {
            actions.push(Action::AcceptPenalty);
        } else if actions.is_empty() {
            actions.push(Action::Draw);
        }
        Ok(actions)
    }

    fn choices_for(&self, card: &Card) -> Vec<PlayChoice> {
        if card.value == Value::Trade {
            let targets: Vec<PlayerId> = (0..self.players.len())
                .filter(|&seat| seat != self.current_player && !self.players[seat].knocked_out)
                .collect();
            if targets.is_empty() {
                return PLAYABLE_COLORS.iter().map(|c| PlayChoice::Color(*c)).collect();
            }
            return PLAYABLE_COLORS
                .iter()
                .flat_map(|color| {
                    targets.iter().map(move |target| PlayChoice::Trade {
                        color: *color,
                        target: *target,
                    })
                })
                .collect();
        }
        if card.is_wild() {
            return PLAYABLE_COLORS.iter().map(|c| PlayChoice::Color(*c)).collect();
        }
        if card.value == Value::Zero && self.policy.damage {
            return vec![
                PlayChoice::Zero(ZeroChoice::Bank),
                PlayChoice::Zero(ZeroChoice::Detonate),
            ];
        }
        vec![PlayChoice::None]
    }

    /// Submit the decision for the seat the engine is waiting on.
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: Action,
        mgr: &mut dyn GameManager,
    ) -> Result<(), GameError> {
        if self.phase == TurnPhase::GameOver {
            return Err(GameError::GameOver);
        }
        if player >= self.players.len() {
            return Err(GameError::InvalidPlayer(player));
        }
        if self.awaiting_user != Some(player) {
            if player != self.current_player {
                return Err(GameError::NotPlayersTurn);
            }
            return Err(InvalidAction::NotAwaitingInput.into());
        }
        if let Action::Play { hand_index, .. } = action {
            if hand_index >= self.players[player].hand.len() {
                return Err(InvalidAction::HandIndex(hand_index).into());
            }
        }
        if !self.legal_actions(player)?.contains(&action) {
            return Err(InvalidAction::NotLegal(action).into());
        }
        self.awaiting_user = None;
        self.resolve(action, mgr);
        Ok(())
    }

    fn resolve(&mut self, action: Action, mgr: &mut dyn GameManager) {
        match action {
            Action::Play { hand_index, choice } => {
                self.discard(hand_index, choice, mgr);
            }
            Action::Draw => self.no_match(mgr),
            Action::AcceptPenalty => self.get_penalty(mgr),
        }
        self.turns += 1;
    }

    fn ai_action(&mut self) -> Action {
        if self.penalty_card.is_some() {
            return Action::AcceptPenalty;
        }
        let current = self.current_player;
        match self.players[current].matching(self.current_color, self.current_value) {
            Some(hand_index) => {
                let card = self.players[current].hand[hand_index];
                let choice = self.ai_choice(card);
                Action::Play { hand_index, choice }
            }
            None => Action::Draw,
        }
    }

    fn ai_choice(&mut self, card: Card) -> PlayChoice {
        if card.value == Value::Trade {
            let color = pick_color(&mut self.rng, self.current_color);
            return match self.find_target() {
                Some(target) => PlayChoice::Trade { color, target },
                None => PlayChoice::Color(color),
            };
        }
        if card.is_wild() {
            return PlayChoice::Color(pick_color(&mut self.rng, self.current_color));
        }
        if card.value == Value::Zero && self.policy.damage {
            return PlayChoice::Zero(self.ai_zero_choice());
        }
        PlayChoice::None
    }

    fn ai_zero_choice(&mut self) -> ZeroChoice {
        if self.damage_pool < ZERO_SAFE_POOL || self.rng.gen_bool(0.5) {
            ZeroChoice::Bank
        } else {
            ZeroChoice::Detonate
        }
    }

    /// Whether `card` may be played by the acting seat right now.
    pub fn is_card_playable(&self, card: &Card) -> bool {
        match self.penalty_card {
            Some(penalty) if penalty.value == Value::Skip => false,
            Some(_) => {
                let counter = card.color == self.current_color
                    && matches!(card.value, Value::Skip | Value::Reverse);
                let chain = self.policy.chain_penalties
                    && (card.value == Value::WildDrawFour
                        || (card.value == Value::DrawTwo
                            && card.matches(self.current_color, self.current_value)));
                counter || chain
            }
            None => card.matches(self.current_color, self.current_value),
        }
    }

    /// Play the card at `hand_index` for the acting seat. The index must be legal.
    fn discard(
        &mut self,
        hand_index: usize,
        choice: PlayChoice,
        mgr: &mut dyn GameManager,
    ) -> PlayOutcome {
        let current = self.current_player;
        let pending = self.penalty_card.is_some();
        let card = self.players[current].discard(hand_index);
        self.deck.push_discard(card);
        debug!(player = %self.players[current].name, %card, "discard");

        let outcome = if self.players[current].hand.is_empty() {
            PlayOutcome::HandEmptied
        } else {
            let mut zero = None;
            let mut effect = CardEffect::None;
            if card.is_numbered() {
                zero = self.set_damage_pool(card, choice, mgr);
            } else {
                effect = self.take_card_action(card, choice, mgr);
            }
            self.set_next_color_and_value(card, choice);
            let chained = self.update_penalty(card, pending);
            self.outcome_for(card, pending, zero, effect, chained)
        };

        if self.players[current].hand.len() == 1 {
            self.players[current].uno();
        }
        mgr.on_card_play(Some(current), card, &outcome);
        outcome
    }

    fn outcome_for(
        &self,
        card: Card,
        pending: bool,
        zero: Option<ZeroChoice>,
        effect: CardEffect,
        chained: Option<usize>,
    ) -> PlayOutcome {
        let color = self.current_color;
        if let Some(pool) = chained {
            return PlayOutcome::Chained { pool };
        }
        if let Some(choice) = zero {
            return PlayOutcome::Zero(choice);
        }
        match (card.value, effect) {
            (Value::Reverse, _) => PlayOutcome::Reverse { countered: pending },
            (Value::Skip, _) if pending => PlayOutcome::Countered,
            (Value::WildDrawFour, _) => PlayOutcome::Wild { color },
            (Value::WildChaos, _) => PlayOutcome::Chaos {
                color,
                value: self.current_value,
            },
            (Value::Trade, CardEffect::Trade(target)) => PlayOutcome::Trade { color, target },
            (Value::DiscardAll, CardEffect::Swept(swept)) => PlayOutcome::DiscardAll { color, swept },
            (Value::WildHitAll, _) => PlayOutcome::HitAll { color },
            _ => PlayOutcome::Matched,
        }
    }

    /// Numbered cards feed the damage pool outside Traditional mode.
    fn set_damage_pool(
        &mut self,
        card: Card,
        choice: PlayChoice,
        mgr: &mut dyn GameManager,
    ) -> Option<ZeroChoice> {
        if !self.policy.damage {
            return None;
        }
        let face = card.value.face()?;
        let mut zero = None;
        if face == 0 {
            let decision = match choice {
                PlayChoice::Zero(decision) => decision,
                _ => self.ai_zero_choice(),
            };
            match decision {
                ZeroChoice::Bank => {
                    debug!("+{ZERO_BANK} damage");
                    self.damage_pool += ZERO_BANK;
                    self.damage_types.insert(card.color);
                }
                ZeroChoice::Detonate => {
                    debug!("clear damage");
                    self.damage_pool = 0;
                    self.damage_types.clear();
                }
            }
            zero = Some(decision);
        } else {
            self.damage_pool += face as u32;
            self.damage_types.insert(card.color);
        }
        debug!(pool = self.damage_pool, "damage pool");
        mgr.on_damage_change();
        zero
    }

    fn take_card_action(
        &mut self,
        card: Card,
        choice: PlayChoice,
        mgr: &mut dyn GameManager,
    ) -> CardEffect {
        let current = self.current_player;
        match card.value {
            Value::Reverse => {
                self.reverse();
                CardEffect::None
            }
            Value::Trade => {
                let target = match choice {
                    PlayChoice::Trade { target, .. } => Some(target),
                    _ => self.find_target(),
                };
                let traded = target.filter(|&target| self.trade(current, target));
                CardEffect::Trade(traded)
            }
            Value::DiscardAll => {
                debug!(color = ?self.current_color, "DISCARD ALL");
                let swept = self.players[current].discard_all_by_color(self.current_color);
                for (idx, swept_card) in swept.iter().enumerate() {
                    self.deck.bury_discard(*swept_card);
                    self.scheduler.schedule_after(
                        Task::Sweep {
                            player: current,
                            card: *swept_card,
                        },
                        SWEEP_STAGGER_TICKS * (idx as u64 + 1),
                    );
                }
                CardEffect::Swept(swept.len())
            }
            Value::WildHitAll => {
                self.wild_hit_all(current, mgr);
                CardEffect::None
            }
            _ => CardEffect::None,
        }
    }

    fn set_next_color_and_value(&mut self, card: Card, choice: PlayChoice) {
        if !card.is_wild() {
            self.current_color = card.color;
            self.current_value = card.value;
            return;
        }
        let chosen = match choice {
            PlayChoice::Color(color) | PlayChoice::Trade { color, .. } => Some(color),
            _ => None,
        };
        self.current_color = match chosen {
            Some(color) if color != Color::Wild => color,
            _ => pick_color(&mut self.rng, self.current_color),
        };
        // Other wilds keep the last face value in play.
        if card.value == Value::WildChaos {
            self.current_value = pick_face(&mut self.rng);
        }
        debug!(color = ?self.current_color, value = ?self.current_value, "wild resolved");
    }

    /// Returns the new pool size when the play chained onto a pending penalty.
    fn update_penalty(&mut self, card: Card, pending: bool) -> Option<usize> {
        match (pending, card.is_penalty()) {
            (false, true) => {
                self.penalty_card = Some(card);
                self.penalty_pool += card.penalty_draw();
                None
            }
            (true, _) if self.policy.chain_penalties && card.penalty_draw() > 0 => {
                self.penalty_pool += card.penalty_draw();
                debug!(pool = self.penalty_pool, "penalty chained");
                Some(self.penalty_pool)
            }
            (true, _) => {
                debug!("penalty countered");
                self.clear_penalty();
                None
            }
            (false, false) => None,
        }
    }

    fn clear_penalty(&mut self) {
        self.penalty_card = None;
        self.penalty_pool = 0;
    }

    /// Resolve the pending penalty for the acting seat.
    pub fn get_penalty(&mut self, mgr: &mut dyn GameManager) {
        let Some(penalty) = self.penalty_card else {
            return;
        };
        let current = self.current_player;
        if penalty.value == Value::Skip {
            debug!("SKIP");
            self.clear_penalty();
            return;
        }
        if let Some(index) = self.players[current].receive_penalty(self.current_color) {
            debug!("penalty avoided");
            self.discard(index, PlayChoice::None, mgr);
            return;
        }
        let pool = self.penalty_pool;
        debug!(pool, "penalty draw");
        self.clear_penalty();
        self.draw_for(current, pool, mgr);
    }

    /// No legal card: take the damage pool, then draw one card.
    fn no_match(&mut self, mgr: &mut dyn GameManager) {
        let current = self.current_player;
        if self.policy.damage {
            self.process_player_damage(current, mgr);
        }
        debug!("no matched card => draw");
        self.draw_for(current, 1, mgr);
    }

    /// Deal `count` cards to `player`; a short draw knocks the player out.
    fn draw_for(&mut self, player: PlayerId, count: usize, mgr: &mut dyn GameManager) -> usize {
        let cards = self.deck.draw(count, self.policy.recycle, &mut self.rng);
        if !cards.is_empty() {
            self.players[player].deal(&cards);
            mgr.on_card_draw(player, &cards, false);
        }
        if cards.len() < count {
            self.process_deck_damage(player, mgr);
        }
        cards.len()
    }

    /// Deliver the damage pool to `player` and reset it.
    pub fn process_player_damage(&mut self, player: PlayerId, mgr: &mut dyn GameManager) {
        let pool = self.damage_pool;
        let types = std::mem::take(&mut self.damage_types);
        self.damage_pool = 0;
        let before = self.players[player].hp;
        self.apply_damage(player, pool);
        debug!(player, before, after = self.players[player].hp, "receive damage");
        mgr.on_hp_change(player, &types);
        mgr.on_damage_change();
    }

    /// The card universe ran dry while `player` had to draw.
    pub fn process_deck_damage(&mut self, player: PlayerId, mgr: &mut dyn GameManager) {
        info!(player = %self.players[player].name, "deck empty => player knocked out");
        self.players[player].hp = 0;
        self.knock_out(player);
        self.damage_pool = 0;
        self.damage_types.clear();
        mgr.on_hp_change(player, &DamageTypes::new());
        mgr.on_damage_change();
    }

    /// Death-Match hoarding damage, credited to every other living seat.
    pub fn process_player_extra_damage(&mut self, player: PlayerId, mgr: &mut dyn GameManager) {
        let threshold = self.settings.max_hand_threshold;
        if self.players[player].hand.len() <= threshold {
            self.players[player].damage_stack = 0;
            return;
        }
        let stack = self.players[player].damage_stack;
        let damage = u64::from(self.settings.initial_hp) * u64::from(stack) / 100;
        let damage = u32::try_from(damage).unwrap_or(u32::MAX).max(1);
        self.players[player].damage_stack += 1;
        let dealt = self.apply_damage(player, damage);
        debug!(player, damage, stack, "hand overflow damage");
        for (seat, other) in self.players.iter_mut().enumerate() {
            if seat != player && !other.knocked_out {
                other.score = other.score.saturating_add(dealt);
            }
        }
        mgr.on_hp_change(player, &DamageTypes::new());
    }

    fn apply_damage(&mut self, player: PlayerId, amount: u32) -> u32 {
        let target = &mut self.players[player];
        let dealt = amount.min(target.hp);
        target.hp -= dealt;
        if target.hp == 0 && !target.knocked_out {
            self.knock_out(player);
        }
        dealt
    }

    fn knock_out(&mut self, player: PlayerId) {
        let target = &mut self.players[player];
        if !target.knocked_out {
            info!(player = %target.name, "knocked out");
        }
        target.knocked_out = true;
        target.damage_stack = 0;
    }

    fn reverse(&mut self) {
        debug!("REVERSE");
        self.clockwise = !self.clockwise;
    }

    /// Living opponent with the strictly smallest hand; ties go to the earliest seat.
    pub fn find_target(&self) -> Option<PlayerId> {
        let mut target: Option<PlayerId> = None;
        for (seat, player) in self.players.iter().enumerate() {
            if seat == self.current_player || player.knocked_out {
                continue;
            }
            let smaller = match target {
                Some(best) => player.hand.len() < self.players[best].hand.len(),
                None => true,
            };
            if smaller {
                target = Some(seat);
            }
        }
        target
    }

    /// Swap hands; a no-op when either side is knocked out.
    fn trade(&mut self, first: PlayerId, second: PlayerId) -> bool {
        if first == second
            || second >= self.players.len()
            || self.players[first].knocked_out
            || self.players[second].knocked_out
        {
            return false;
        }
        debug!(first, second, "TRADE");
        let first_hand = std::mem::take(&mut self.players[first].hand);
        let second_hand = std::mem::replace(&mut self.players[second].hand, first_hand);
        self.players[first].hand = second_hand;
        for seat in [first, second] {
            if self.players[seat].hand.len() == 1 {
                self.players[seat].uno();
            } else {
                self.players[seat].uno = false;
            }
        }
        true
    }

    fn wild_hit_all(&mut self, current: PlayerId, mgr: &mut dyn GameManager) {
        debug!("WILD HIT ALL");
        for seat in 0..self.players.len() {
            if seat != current && !self.players[seat].knocked_out {
                self.draw_for(seat, HIT_ALL_DRAW, mgr);
            }
        }
    }

    fn next_index(&self, from: PlayerId) -> PlayerId {
        let count = self.players.len();
        if self.clockwise {
            (from + 1) % count
        } else {
            (from + count - 1) % count
        }
    }

    /// Next seat in turn order that is still in the round.
    pub fn next_alive_player_index(&self, from: PlayerId) -> Option<PlayerId> {
        let mut seat = from;
        for _ in 1..self.players.len() {
            seat = self.next_index(seat);
            if !self.players[seat].knocked_out {
                return Some(seat);
            }
        }
        None
    }

    /// Close the acting seat's turn and move on one seat.
    pub fn end_turn(&mut self, mgr: &mut dyn GameManager) {
        mgr.on_turn_end(self.current_player);
        self.current_player = self.next_index(self.current_player);
    }

    pub fn is_round_over(&self) -> bool {
        if self.players.iter().any(Player::is_going_out) {
            return true;
        }
        if self.policy.host_knockout_ends_round && self.players[HOST_SEAT].knocked_out {
            return true;
        }
        self.players.iter().filter(|p| !p.knocked_out).count() <= 1
    }

    pub fn is_game_over(&self) -> bool {
        match self.policy.game_end {
            GameEnd::AfterOneRound => true,
            GameEnd::ScoreGoal => self
                .players
                .iter()
                .any(|p| p.score >= self.settings.score_goal),
            GameEnd::HostKnockedOut => self.players[HOST_SEAT].knocked_out,
        }
    }

    /// Score the finished round and move to the next round or game over.
    pub fn process_result(&mut self, mgr: &mut dyn GameManager) {
        settle_round(self.policy.scoring, &mut self.players);
        let scores: Vec<u32> = self.players.iter().map(|p| p.score).collect();
        info!(round = self.round, ?scores, "round over");
        if self.is_game_over() {
            let winner = self.standings().first().copied().unwrap_or(HOST_SEAT);
            self.status = GameStatus::Finished { winner };
            self.phase = TurnPhase::GameOver;
            info!(winner, "game over");
            mgr.process_game_over();
        } else {
            self.phase = TurnPhase::RoundOver;
            mgr.process_round_over();
        }
    }
}

/// First seat holding the highest value, and whether nobody ties it.
fn highest_seat(peek: &[Card]) -> (PlayerId, bool) {
    let mut highest = 0;
    let mut unique = true;
    for seat in 1..peek.len() {
        if peek[seat].value > peek[highest].value {
            highest = seat;
            unique = true;
        } else if peek[seat].value == peek[highest].value {
            unique = false;
        }
    }
    (highest, unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::{EventLog, GameEvent};

    fn red(value: Value) -> Card {
        Card::new(Color::Red, value)
    }

    fn card(color: Color, value: Value) -> Card {
        Card::new(color, value)
    }

    fn started(mode: GameMode, seed: u64) -> (PunoGame, EventLog) {
        let mut log = EventLog::new();
        let mut game = PunoGame::builder(mode)
            .with_seed(seed)
            .with_all_ai()
            .build()
            .expect("valid config");
        game.start(&mut log);
        (game, log)
    }

    /// Puts the round into a known position: every seat holds `hands[seat]`.
    fn arrange(game: &mut PunoGame, hands: [Vec<Card>; 4], color: Color, value: Value) {
        for (seat, hand) in hands.into_iter().enumerate() {
            game.players[seat].hand = hand;
        }
        game.current_color = color;
        game.current_value = value;
        game.penalty_card = None;
        game.penalty_pool = 0;
        game.damage_pool = 0;
        game.damage_types.clear();
        game.current_player = 0;
    }

    fn filler() -> Vec<Card> {
        vec![card(Color::Blue, Value::Nine), card(Color::Blue, Value::Eight)]
    }

    #[test]
    fn initialize_deals_traditional_round() {
        let (game, log) = started(GameMode::Traditional, 42);
        for player in game.players() {
            assert_eq!(player.hand().len(), 7);
        }
        assert_eq!(game.deck().len(), 108 - 28 - 1);
        assert_eq!(game.deck().discard_pile().len(), 1);
        let first = game.deck().top().expect("opening card");
        assert!(!first.is_wild());
        assert_eq!(game.card_count(), game.universe());
        assert!(log.events().contains(&GameEvent::RoundStart));
        let peeks = log
            .events()
            .iter()
            .filter(|event| matches!(event, GameEvent::CardDraw { peek: true, .. }))
            .count();
        assert_eq!(peeks, 4);
    }

    #[test]
    fn dealer_is_strict_highest_peek() {
        // Top of deck is the end: seats peek Two, Nine, Nine, Five -> tie -> redraw.
        let mut deck = vec![red(Value::One); 40];
        deck.extend([
            red(Value::Three),
            red(Value::Eight),
            red(Value::Four),
            red(Value::Two),
        ]);
        deck.extend([red(Value::Five), red(Value::Nine), red(Value::Nine), red(Value::Two)]);
        let mut log = EventLog::new();
        let mut game = PunoGame::builder(GameMode::Traditional)
            .with_deck(deck)
            .with_all_ai()
            .build()
            .expect("valid config");
        game.start(&mut log);
        // Second peek: Two, Four, Eight, Three -> seat 2 wins.
        assert_eq!(game.current_player(), 2);
        assert_eq!(game.card_count(), 48);
    }

    #[test]
    fn end_turn_cycles_and_reverse_toggles() {
        let (mut game, mut log) = started(GameMode::Traditional, 3);
        game.clockwise = true;
        let start = game.current_player();
        for _ in 0..4 {
            game.end_turn(&mut log);
        }
        assert_eq!(game.current_player(), start);

        arrange(
            &mut game,
            [
                vec![red(Value::Reverse), red(Value::Reverse), red(Value::One)],
                filler(),
                filler(),
                filler(),
            ],
            Color::Red,
            Value::Five,
        );
        let before = game.clockwise();
        game.resolve(
            Action::Play {
                hand_index: 0,
                choice: PlayChoice::None,
            },
            &mut log,
        );
        assert_eq!(game.clockwise(), !before);
        game.resolve(
            Action::Play {
                hand_index: 0,
                choice: PlayChoice::None,
            },
            &mut log,
        );
        assert_eq!(game.clockwise(), before);
        game.clockwise = false;
        game.end_turn(&mut log);
        assert_eq!(game.current_player(), 3);
    }

    #[test]
    fn draw_two_penalty_without_counter_draws_pool() {
        let (mut game, mut log) = started(GameMode::Traditional, 5);
        arrange(
            &mut game,
            [
                vec![card(Color::Blue, Value::Three), card(Color::Green, Value::Skip)],
                filler(),
                filler(),
                filler(),
            ],
            Color::Red,
            Value::DrawTwo,
        );
        game.penalty_card = Some(red(Value::DrawTwo));
        game.penalty_pool = 2;
        game.get_penalty(&mut log);
        assert_eq!(game.players()[0].hand().len(), 4);
        assert_eq!(game.penalty_card(), None);
        assert_eq!(game.penalty_pool(), 0);
    }

    #[test]
    fn same_colour_skip_cancels_pending_penalty() {
        let (mut game, mut log) = started(GameMode::Traditional, 6);
        arrange(
            &mut game,
            [
                vec![card(Color::Blue, Value::Three), red(Value::Skip)],
                filler(),
                filler(),
                filler(),
            ],
            Color::Red,
            Value::DrawTwo,
        );
        game.penalty_card = Some(red(Value::DrawTwo));
        game.penalty_pool = 2;
        game.get_penalty(&mut log);
        assert_eq!(game.players()[0].hand(), &[card(Color::Blue, Value::Three)]);
        assert_eq!(game.penalty_card(), None);
        assert_eq!(game.penalty_pool(), 0);
        assert!(log.events().iter().any(|event| matches!(
            event,
            GameEvent::CardPlay {
                outcome: PlayOutcome::Countered,
                ..
            }
        )));
    }

    #[test]
    fn pending_skip_has_no_counter() {
        let (mut game, mut log) = started(GameMode::Traditional, 7);
        arrange(
            &mut game,
            [vec![red(Value::Skip), red(Value::Reverse)], filler(), filler(), filler()],
            Color::Red,
            Value::Skip,
        );
        game.penalty_card = Some(red(Value::Skip));
        assert!(!game.is_card_playable(&red(Value::Reverse)));
        assert_eq!(game.legal_actions(0).expect("acting seat"), vec![Action::AcceptPenalty]);
        game.get_penalty(&mut log);
        assert_eq!(game.players()[0].hand().len(), 2);
        assert_eq!(game.penalty_card(), None);
    }

    #[test]
    fn death_match_chains_draw_cards() {
        let (mut game, mut log) = started(GameMode::DeathMatch, 8);
        arrange(
            &mut game,
            [
                vec![card(Color::Wild, Value::WildDrawFour), card(Color::Blue, Value::Three)],
                filler(),
                filler(),
                filler(),
            ],
            Color::Red,
            Value::DrawTwo,
        );
        game.penalty_card = Some(red(Value::DrawTwo));
        game.penalty_pool = 2;
        assert!(game.is_card_playable(&card(Color::Wild, Value::WildDrawFour)));
        let outcome = game.discard(0, PlayChoice::Color(Color::Green), &mut log);
        assert_eq!(outcome, PlayOutcome::Chained { pool: 6 });
        assert_eq!(game.penalty_card(), Some(red(Value::DrawTwo)));
        assert_eq!(game.penalty_pool(), 6);
        assert_eq!(game.current_color(), Color::Green);
    }

    #[test]
    fn battle_puno_no_match_takes_pool_damage() {
        let (mut game, mut log) = started(GameMode::BattlePuno, 9);
        arrange(
            &mut game,
            [vec![card(Color::Blue, Value::Three)], filler(), filler(), filler()],
            Color::Red,
            Value::Five,
        );
        game.players[0].hp = 30;
        game.damage_pool = 25;
        game.damage_types.insert(Color::Red);
        assert_eq!(game.legal_actions(0).expect("acting seat"), vec![Action::Draw]);
        game.resolve(Action::Draw, &mut log);
        assert_eq!(game.players()[0].hp(), 5);
        assert!(!game.players()[0].is_knocked_out());
        assert_eq!(game.damage_pool(), 0);
        assert!(game.damage_types().is_empty());
        assert_eq!(game.players()[0].hand().len(), 2);
    }

    #[test]
    fn lethal_pool_knocks_out_then_draws() {
        let (mut game, mut log) = started(GameMode::BattlePuno, 10);
        arrange(
            &mut game,
            [vec![card(Color::Blue, Value::Three)], filler(), filler(), filler()],
            Color::Red,
            Value::Five,
        );
        game.players[0].hp = 12;
        game.players[0].damage_stack = 4;
        game.damage_pool = 40;
        game.resolve(Action::Draw, &mut log);
        let player = &game.players()[0];
        assert_eq!(player.hp(), 0);
        assert!(player.is_knocked_out());
        assert_eq!(player.damage_stack(), 0);
        assert_eq!(player.hand().len(), 2);
    }

    #[test]
    fn traditional_no_match_ignores_pool() {
        let (mut game, mut log) = started(GameMode::Traditional, 11);
        arrange(
            &mut game,
            [vec![card(Color::Blue, Value::Three)], filler(), filler(), filler()],
            Color::Red,
            Value::Five,
        );
        game.resolve(Action::Draw, &mut log);
        assert_eq!(game.players()[0].hp(), DEFAULT_HP);
        assert_eq!(game.players()[0].hand().len(), 2);
    }

    #[test]
    fn death_match_overflow_damage_escalates() {
        let (mut game, mut log) = started(GameMode::DeathMatch, 12);
        assert_eq!(game.settings().max_hand_threshold, 8);
        game.players[1].hand = vec![card(Color::Blue, Value::One); 9];
        game.players[1].damage_stack = 2;
        game.players[1].hp = DEFAULT_HP;
        let scores: Vec<u32> = game.players().iter().map(Player::score).collect();
        game.process_player_extra_damage(1, &mut log);
        let expected = (DEFAULT_HP * 2 / 100).max(1);
        assert_eq!(game.players()[1].hp(), DEFAULT_HP - expected);
        assert_eq!(game.players()[1].damage_stack(), 3);
        for seat in [0, 2, 3] {
            assert_eq!(game.players()[seat].score(), scores[seat] + expected);
        }
        assert_eq!(game.players()[1].score(), scores[1]);

        game.players[1].hand.truncate(8);
        game.process_player_extra_damage(1, &mut log);
        assert_eq!(game.players()[1].damage_stack(), 0);
    }

    #[test]
    fn overflow_damage_on_huge_hp_does_not_overflow() {
        let (mut game, mut log) = started(GameMode::DeathMatch, 12);
        game.settings.initial_hp = u32::MAX;
        game.players[1].hand = vec![card(Color::Blue, Value::One); 9];
        game.players[1].hp = u32::MAX;
        game.players[1].damage_stack = 150;
        game.process_player_extra_damage(1, &mut log);
        let player = &game.players()[1];
        assert_eq!(player.hp(), 0);
        assert!(player.is_knocked_out());

        game.players[2].hand = vec![card(Color::Blue, Value::One); 9];
        game.players[2].hp = u32::MAX;
        game.players[2].damage_stack = 50;
        game.process_player_extra_damage(2, &mut log);
        let expected = (u64::from(u32::MAX) * 50 / 100) as u32;
        assert_eq!(game.players()[2].hp(), u32::MAX - expected);
        assert_eq!(game.players()[2].damage_stack(), 51);
        assert_eq!(game.players()[0].score(), u32::MAX);
    }

    #[test]
    fn ai_trade_targets_smallest_living_hand() {
        let (mut game, mut log) = started(GameMode::Traditional, 13);
        let trade = card(Color::Wild, Value::Trade);
        arrange(
            &mut game,
            [
                vec![trade, red(Value::One), red(Value::Two)],
                vec![red(Value::Three); 4],
                vec![red(Value::Four); 2],
                vec![red(Value::Five); 2],
            ],
            Color::Red,
            Value::Six,
        );
        assert_eq!(game.find_target(), Some(2));
        game.players[2].knocked_out = true;
        assert_eq!(game.find_target(), Some(3));
        game.players[2].knocked_out = false;

        let action = game.ai_action();
        assert!(matches!(
            action,
            Action::Play {
                hand_index: 0,
                choice: PlayChoice::Trade { target: 2, .. }
            }
        ));
        game.resolve(action, &mut log);
        assert_eq!(game.players()[0].hand(), &[red(Value::Four); 2]);
        assert_eq!(game.players()[2].hand(), &[red(Value::One), red(Value::Two)]);
        assert_ne!(game.current_color(), Color::Wild);
    }

    #[test]
    fn trade_with_knocked_out_seat_is_a_no_op() {
        let (mut game, _log) = started(GameMode::BattlePuno, 14);
        game.players[3].knocked_out = true;
        let before = game.players()[3].hand().to_vec();
        assert!(!game.trade(0, 3));
        assert_eq!(game.players()[3].hand(), before.as_slice());
    }

    #[test]
    fn discard_all_sweeps_active_colour_immediately() {
        let (mut game, mut log) = started(GameMode::Traditional, 15);
        arrange(
            &mut game,
            [
                vec![
                    card(Color::Wild, Value::DiscardAll),
                    red(Value::One),
                    card(Color::Blue, Value::Two),
                    red(Value::Three),
                ],
                filler(),
                filler(),
                filler(),
            ],
            Color::Red,
            Value::Six,
        );
        let total = game.card_count();
        let outcome = game.discard(0, PlayChoice::Color(Color::Blue), &mut log);
        assert!(matches!(outcome, PlayOutcome::DiscardAll { swept: 2, color: Color::Blue }));
        assert_eq!(game.players()[0].hand(), &[card(Color::Blue, Value::Two)]);
        assert!(game.players()[0].called_uno());
        assert_eq!(game.card_count(), total);
        assert_eq!(game.scheduler.pending(), 2);
        assert_eq!(game.deck().top(), Some(card(Color::Wild, Value::DiscardAll)));

        let swept_notices = |log: &EventLog| {
            log.events()
                .iter()
                .filter(|event| matches!(event, GameEvent::CardPlay { outcome: PlayOutcome::Swept, .. }))
                .count()
        };
        assert_eq!(swept_notices(&log), 0);
        for _ in 0..SWEEP_STAGGER_TICKS * 2 {
            game.update(&mut log);
        }
        assert_eq!(swept_notices(&log), 2);
    }

    #[test]
    fn wild_hit_all_feeds_every_living_opponent() {
        let (mut game, mut log) = started(GameMode::BattlePuno, 16);
        arrange(
            &mut game,
            [
                vec![card(Color::Wild, Value::WildHitAll), red(Value::One)],
                filler(),
                filler(),
                filler(),
            ],
            Color::Red,
            Value::Six,
        );
        game.players[2].knocked_out = true;
        game.discard(0, PlayChoice::Color(Color::Yellow), &mut log);
        assert_eq!(game.players()[1].hand().len(), 4);
        assert_eq!(game.players()[2].hand().len(), 2);
        assert_eq!(game.players()[3].hand().len(), 4);
        assert_eq!(game.current_color(), Color::Yellow);
    }

    #[test]
    fn wild_plays_keep_the_last_face_value() {
        for wild in [
            Value::WildDrawFour,
            Value::Trade,
            Value::DiscardAll,
            Value::WildHitAll,
        ] {
            let (mut game, mut log) = started(GameMode::Traditional, 18);
            arrange(
                &mut game,
                [
                    vec![card(Color::Wild, wild), red(Value::One), red(Value::Two)],
                    filler(),
                    filler(),
                    filler(),
                ],
                Color::Red,
                Value::Five,
            );
            let choice = match wild {
                Value::Trade => PlayChoice::Trade {
                    color: Color::Green,
                    target: 1,
                },
                _ => PlayChoice::Color(Color::Green),
            };
            game.discard(0, choice, &mut log);
            assert_eq!(game.current_color(), Color::Green, "{wild:?}");
            assert_eq!(game.current_value(), Value::Five, "{wild:?}");
            assert!(card(Color::Blue, Value::Five).matches(game.current_color(), game.current_value()));
        }
    }

    #[test]
    fn zero_banks_or_detonates_pool() {
        let (mut game, mut log) = started(GameMode::BattlePuno, 17);
        arrange(
            &mut game,
            [
                vec![red(Value::Zero), red(Value::Seven), red(Value::Zero), red(Value::One)],
                filler(),
                filler(),
                filler(),
            ],
            Color::Red,
            Value::Six,
        );
        game.discard(1, PlayChoice::None, &mut log);
        assert_eq!(game.damage_pool(), 7);
        let outcome = game.discard(0, PlayChoice::Zero(ZeroChoice::Bank), &mut log);
        assert_eq!(outcome, PlayOutcome::Zero(ZeroChoice::Bank));
        assert_eq!(game.damage_pool(), 17);
        assert!(game.damage_types().contains(&Color::Red));
        game.discard(0, PlayChoice::Zero(ZeroChoice::Detonate), &mut log);
        assert_eq!(game.damage_pool(), 0);
        assert!(game.damage_types().is_empty());
    }

    #[test]
    fn exhausted_deck_knocks_out_drawing_player() {
        let (mut game, mut log) = started(GameMode::DeathMatch, 18);
        arrange(
            &mut game,
            [vec![card(Color::Blue, Value::Three)], filler(), filler(), filler()],
            Color::Red,
            Value::Five,
        );
        game.deck = Deck::from_cards(Vec::new());
        game.players[0].hp = 50;
        game.resolve(Action::Draw, &mut log);
        assert!(game.players()[0].is_knocked_out());
        assert_eq!(game.damage_pool(), 0);
        assert!(game.is_round_over());
    }

    #[test]
    fn chaos_resolves_to_numbered_value() {
        let (mut game, mut log) = started(GameMode::Traditional, 19);
        arrange(
            &mut game,
            [
                vec![card(Color::Wild, Value::WildChaos), red(Value::One)],
                filler(),
                filler(),
                filler(),
            ],
            Color::Red,
            Value::Six,
        );
        let outcome = game.discard(0, PlayChoice::Color(Color::Green), &mut log);
        assert!(game.current_value().face().is_some());
        assert_eq!(
            outcome,
            PlayOutcome::Chaos {
                color: Color::Green,
                value: game.current_value()
            }
        );
    }

    #[test]
    fn emptying_hand_ends_round() {
        let (mut game, mut log) = started(GameMode::Traditional, 20);
        arrange(
            &mut game,
            [vec![red(Value::Skip)], filler(), filler(), filler()],
            Color::Red,
            Value::Six,
        );
        let outcome = game.discard(0, PlayChoice::None, &mut log);
        assert_eq!(outcome, PlayOutcome::HandEmptied);
        assert_eq!(game.penalty_card(), None);
        assert!(game.is_round_over());
        game.process_result(&mut log);
        assert!(game.is_finished());
        assert_eq!(game.winner(), Some(0));
    }

    #[test]
    fn user_input_is_validated() {
        let mut log = EventLog::new();
        let mut game = PunoGame::builder(GameMode::Traditional)
            .with_seed(21)
            .build()
            .expect("valid config");
        game.start(&mut log);
        arrange(
            &mut game,
            [
                vec![card(Color::Blue, Value::Three), red(Value::One)],
                filler(),
                filler(),
                filler(),
            ],
            Color::Red,
            Value::Six,
        );
        let wrong = Action::Play {
            hand_index: 0,
            choice: PlayChoice::None,
        };
        assert!(matches!(
            game.apply_action(0, wrong, &mut log),
            Err(GameError::InvalidAction(InvalidAction::NotAwaitingInput))
        ));
        game.update(&mut log);
        assert_eq!(game.awaiting_user(), Some(0));
        assert!(matches!(
            game.apply_action(0, wrong, &mut log),
            Err(GameError::InvalidAction(InvalidAction::NotLegal(_)))
        ));
        assert!(matches!(
            game.apply_action(1, Action::Draw, &mut log),
            Err(GameError::NotPlayersTurn)
        ));
        let right = Action::Play {
            hand_index: 1,
            choice: PlayChoice::None,
        };
        game.apply_action(0, right, &mut log).expect("legal play");
        assert_eq!(game.awaiting_user(), None);
        game.update(&mut log);
        assert_eq!(log.events().last(), Some(&GameEvent::TurnEnd(0)));
    }

    #[test]
    fn busy_scene_holds_the_engine() {
        let (mut game, mut log) = started(GameMode::Traditional, 22);
        log.set_busy(true);
        let turns = game.turns();
        for _ in 0..200 {
            game.update(&mut log);
        }
        assert_eq!(game.turns(), turns);
        log.set_busy(false);
        for _ in 0..AI_THINK_TICKS + 2 {
            game.update(&mut log);
        }
        assert_eq!(game.turns(), turns + 1);
    }
}
