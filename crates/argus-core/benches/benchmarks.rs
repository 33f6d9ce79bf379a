use criterion::{Criterion, black_box, criterion_group, criterion_main};

use argus_core::parser::ParsedFile;
use argus_core::rules::RuleRegistry;
use argus_core::rules::bugs::{ConditionAssignment, ConstantCondition, SelfAssignment};
use argus_core::rules::smells::{EmptyNestedBlock, MaxNestingDepth, StrictEquality, UnusedLocals};
use argus_core::tsconfig::TsConfig;

const SOURCE: &str = r#"
import { readFileSync } from 'fs';

export function loadAll(paths: string[]): string[] {
    const out: string[] = [];
    for (const path of paths) {
        let text = '';
        if (text = readFileSync(path, 'utf8')) {
            if (text.length == 0) {}
            out.push(text);
        }
    }
    return out;
}

export class Cache {
    private entries = new Map<string, string>();

    get(key: string): string | undefined {
        const hit = this.entries.get(key);
        if (hit != null) {
            return hit;
        }
        return undefined;
    }
}
"#;

fn full_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry.register(Box::new(ConditionAssignment::new()));
    registry.register(Box::new(ConstantCondition::new()));
    registry.register(Box::new(SelfAssignment::new()));
    registry.register(Box::new(UnusedLocals::new()));
    registry.register(Box::new(EmptyNestedBlock::new()));
    registry.register(Box::new(MaxNestingDepth::new()));
    registry.register(Box::new(StrictEquality::new()));
    registry
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_module", |b| {
        b.iter(|| ParsedFile::from_source("bench.ts", black_box(SOURCE)))
    });
}

fn bench_rules(c: &mut Criterion) {
    let file = ParsedFile::from_source("bench.ts", SOURCE);
    let registry = full_registry();
    let config = TsConfig::default();

    c.bench_function("run_all_rules", |b| {
        b.iter(|| registry.run_all(black_box(&file), black_box(&config)))
    });
}

criterion_group!(benches, bench_parse, bench_rules);
criterion_main!(benches);
