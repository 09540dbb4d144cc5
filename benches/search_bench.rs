use criterion::{black_box, criterion_group, criterion_main, Criterion};
use renju::board::{Board, Player, Pos};
use renju::eval::PositionEvaluator;
use renju::pattern::PatternRecognizer;
use renju::rules::{GameRule, RuleValidatorFactory};
use renju::search::{MctsConfig, Minimax, MinimaxConfig, MonteCarloTreeSearch};

fn midgame() -> Board {
    let cells = [(7, 7), (7, 8), (8, 8), (6, 6), (8, 7), (9, 7), (6, 8), (8, 6)];
    cells.iter().fold(Board::new(), |b, &(r, c)| {
        b.place(Pos::new(r, c), b.next_color()).unwrap_or(b)
    })
}

fn bench_eval(c: &mut Criterion) {
    let board = midgame();
    let evaluator = PositionEvaluator::for_rule(GameRule::StandardRenju);
    c.bench_function("evaluate_midgame", |ben| {
        ben.iter(|| black_box(evaluator.evaluate(black_box(&board), Player::Black)))
    });

    let recognizer = PatternRecognizer::new();
    c.bench_function("find_all_patterns_midgame", |ben| {
        ben.iter(|| black_box(recognizer.find_all_patterns(black_box(&board), Player::Black)))
    });
}

fn bench_search(c: &mut Criterion) {
    let board = midgame();
    let validator = RuleValidatorFactory::create(GameRule::StandardRenju);

    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    for depth in [1u8, 2] {
        group.bench_function(format!("minimax_depth_{depth}"), |ben| {
            let config = MinimaxConfig {
                depth,
                width: 10,
                time_limit: None,
            };
            ben.iter(|| {
                let mut searcher = Minimax::with_config(validator, config);
                black_box(searcher.search(black_box(&board), Player::Black))
            })
        });
    }
    for threads in [1usize, 4] {
        group.bench_function(format!("mcts_500_threads_{threads}"), |ben| {
            let config = MctsConfig {
                iterations: 500,
                seed: Some(1),
                threads,
                ..MctsConfig::default()
            };
            let mcts = MonteCarloTreeSearch::with_config(validator, config);
            ben.iter(|| black_box(mcts.search(black_box(&board), Player::Black)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_eval, bench_search);
criterion_main!(benches);
