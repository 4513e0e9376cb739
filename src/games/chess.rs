use crate::core::{
    error::{BoardError, EncodingError},
    position,
};
use shakmaty::{
    attacks,
    fen::Fen,
    san::SanPlus,
    zobrist::{Zobrist64, ZobristHash},
    Bitboard, Board, CastlingMode, Chess, Color, EnPassantMode, File, FromSetup, Move, Outcome,
    Position, PositionError, Rank, Role, Square,
};

/// Plies without a capture or pawn move after which the game is drawn
const SEVENTY_FIVE_MOVE_RULE: u32 = 150;

/// Occurrences of the same position after which the game is drawn
const FIVEFOLD_REPETITION: usize = 5;

/// A chess board with make/unmake semantics on top of shakmaty.
///
/// shakmaty positions are copy-make, so every pushed move stores the
/// resulting position and popping simply drops it.
#[derive(Clone, Debug)]
pub struct ChessBoard {
    /// Positions from the root, the last one is the current position
    stack: Vec<Chess>,
    /// Moves between consecutive positions of the stack
    moves: Vec<Move>,
    /// Hash of every position in the stack, for repetition detection
    hashes: Vec<Zobrist64>,
    /// Side forced to move, see `set_turn`
    forced_turn: Option<Color>,
}

impl ChessBoard {
    pub fn new(root: Chess) -> Self {
        ChessBoard {
            hashes: vec![root.zobrist_hash(EnPassantMode::Legal)],
            stack: vec![root],
            moves: vec![],
            forced_turn: None,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let position: Chess = fen
            .trim()
            .parse::<Fen>()
            .map_err(|e| BoardError::InvalidFen(format!("{} ({})", fen, e)))?
            .into_position(CastlingMode::Standard)
            .map_err(|e| BoardError::InvalidFen(format!("{} ({})", fen, e)))?;

        Ok(ChessBoard::new(position))
    }

    /// Current position
    pub fn position(&self) -> &Chess {
        self.stack.last().expect("the root position is never popped")
    }

    /// Piece placement of the current position
    pub fn board(&self) -> &Board {
        self.position().board()
    }

    /// Position the board was created with
    pub fn root(&self) -> &Chess {
        &self.stack[0]
    }

    /// Moves played since the root
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn fen(&self) -> String {
        Fen(self.position().clone().into_setup(EnPassantMode::Legal)).to_string()
    }

    /// SAN of a legal move in the current position
    pub fn san(&self, mov: &Move) -> SanPlus {
        SanPlus::from_move(self.position().clone(), mov)
    }

    /// Overrides the side to move.
    ///
    /// Setting the real side to move removes the override. The board must not
    /// be searched (push/pop) while an override is active.
    pub fn set_turn(&mut self, turn: Color) {
        self.forced_turn = if turn == self.position().turn() {
            None
        } else {
            Some(turn)
        };
    }

    /// Destination squares of every legal move of the side to move,
    /// honoring a turn override.
    pub fn reachable_squares(&self) -> Result<Bitboard, EncodingError> {
        let position = self.position();

        let Some(turn) = self.forced_turn else {
            return Ok(destinations(position.legal_moves()));
        };

        match self.with_turn(turn) {
            Ok(forced) => Ok(destinations(forced.legal_moves())),
            // the side to move is in check: giving the move away leaves its king
            // en prise, which the rules refuse to set up
            Err(_) if position.is_check() => Ok(out_of_turn_targets(position.board(), turn)),
            Err(err) => Err(EncodingError::Oracle(err.to_string())),
        }
    }

    /// The current position with the other side to move
    fn with_turn(&self, turn: Color) -> Result<Chess, PositionError<Chess>> {
        let mut setup = self.position().clone().into_setup(EnPassantMode::Legal);
        setup.turn = turn;
        setup.ep_square = None;
        Chess::from_setup(setup, CastlingMode::Standard)
    }

    /// How many times the current position has occurred
    pub fn repetitions(&self) -> usize {
        let current = self.hashes.last().expect("root hash");
        self.hashes.iter().filter(|hash| *hash == current).count()
    }
}

impl Default for ChessBoard {
    fn default() -> Self {
        ChessBoard::new(Chess::default())
    }
}

impl From<Chess> for ChessBoard {
    fn from(position: Chess) -> Self {
        ChessBoard::new(position)
    }
}

impl position::Position for ChessBoard {
    type Action = Move;

    fn valid_actions(&self) -> Vec<Self::Action> {
        debug_assert!(self.forced_turn.is_none(), "turn override still active");
        self.position().legal_moves().into_iter().collect()
    }

    fn is_legal(&self, action: &Self::Action) -> bool {
        self.position().is_legal(action)
    }

    fn push(&mut self, action: &Self::Action) {
        debug_assert!(self.forced_turn.is_none(), "turn override still active");

        let mut next = self.position().clone();
        next.play_unchecked(action);

        self.hashes.push(next.zobrist_hash(EnPassantMode::Legal));
        self.stack.push(next);
        self.moves.push(action.clone());
    }

    fn pop(&mut self) -> Option<Self::Action> {
        let action = self.moves.pop()?;
        self.stack.pop();
        self.hashes.pop();
        Some(action)
    }

    fn turn(&self) -> Color {
        self.forced_turn.unwrap_or_else(|| self.position().turn())
    }

    fn outcome(&self) -> Option<Outcome> {
        let position = self.position();

        if let Some(outcome) = position.outcome() {
            return Some(outcome);
        }

        if position.halfmoves() >= SEVENTY_FIVE_MOVE_RULE
            || self.repetitions() >= FIVEFOLD_REPETITION
        {
            return Some(Outcome::Draw);
        }

        None
    }
}

/// Square the moving piece lands on. Castling lands the king on the
/// c- or g-file, not on the rook.
pub fn destination(mov: &Move) -> Square {
    match *mov {
        Move::Castle { king, rook } => {
            let file = if king < rook { File::G } else { File::C };
            Square::from_coords(file, king.rank())
        }
        _ => mov.to(),
    }
}

fn destinations(moves: impl IntoIterator<Item = Move>) -> Bitboard {
    let mut squares = Bitboard(0);
    for mov in moves {
        squares.add(destination(&mov));
    }
    squares
}

/// Destinations of the moves `color` could make if it were its turn while
/// the opponent is in check. King steps onto attacked squares and pinned
/// pieces leaving their line are left out. Castling and en passant are not
/// considered, capturing the checked king is.
fn out_of_turn_targets(board: &Board, color: Color) -> Bitboard {
    let ours = board.by_color(color);
    let king = board.king_of(color);
    let mut targets = Bitboard(0);

    for square in ours {
        let Some(piece) = board.piece_at(square) else {
            continue;
        };

        let mut moves = piece_targets(board, square, piece.role, color);

        match king {
            Some(king) if king == square => {
                let occupied = board.occupied() ^ Bitboard::from(king);
                moves = moves
                    .into_iter()
                    .filter(|&to| board.attacks_to(to, !color, occupied).is_empty())
                    .collect();
            }
            Some(king) => {
                if let Some(line) = pin_line(board, king, square, color) {
                    moves &= line;
                }
            }
            None => {}
        }

        targets |= moves;
    }

    targets
}

/// Squares a piece attacks or, for pawns, can push to
fn piece_targets(board: &Board, square: Square, role: Role, color: Color) -> Bitboard {
    let ours = board.by_color(color);
    let occupied = board.occupied();

    if role != Role::Pawn {
        return attacks::attacks(square, role.of(color), occupied) & !ours;
    }

    let mut targets = attacks::pawn_attacks(color, square) & board.by_color(!color);

    let forward = color.fold_wb(8, -8);
    if let Some(single) = square.offset(forward).filter(|s| !occupied.contains(*s)) {
        targets.add(single);

        let start_rank = color.fold_wb(Rank::Second, Rank::Seventh);
        if square.rank() == start_rank {
            if let Some(double) = single.offset(forward).filter(|s| !occupied.contains(*s)) {
                targets.add(double);
            }
        }
    }

    targets
}

/// Line through the king and the slider pinning the piece on `square`
fn pin_line(board: &Board, king: Square, square: Square, color: Color) -> Option<Bitboard> {
    let snipers = (attacks::rook_attacks(king, Bitboard(0)) & board.rooks_and_queens()
        | attacks::bishop_attacks(king, Bitboard(0)) & board.bishops_and_queens())
        & board.by_color(!color);

    snipers
        .into_iter()
        .find(|&sniper| (attacks::between(king, sniper) & board.occupied()) == Bitboard::from(square))
        .map(|sniper| attacks::ray(king, sniper))
}
