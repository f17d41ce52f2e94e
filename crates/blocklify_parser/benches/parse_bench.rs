use blocklify_options::ParserOptions;
use blocklify_parser::Parser;
use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

// A medium-size ES5 source with the constructs the importer handles
const JAVASCRIPT_SOURCE: &str = r#"
// A small inventory module
var Inventory = (function () {
    'use strict';

    var items = {}, count = 0;

    function add(name, quantity, price) {
        if (!name || quantity <= 0) {
            throw new Error('invalid item: ' + name);
        }
        var existing = items[name];
        if (existing) {
            existing.quantity += quantity;
        } else {
            items[name] = { quantity: quantity, price: price || 0 };
            count++;
        }
        return items[name];
    }

    function remove(name) {
        var item = items[name];
        if (item === undefined) {
            return false;
        }
        delete items[name];
        count -= 1;
        return true;
    }

    function total() {
        var sum = 0;
        for (var key in items) {
            if (items.hasOwnProperty(key)) {
                sum += items[key].quantity * items[key].price;
            }
        }
        return Math.round(sum * 100) / 100;
    }

    function report() {
        var lines = [], keys = [];
        for (var k in items) keys.push(k);
        keys.sort();
        for (var i = 0; i < keys.length; i++) {
            var entry = items[keys[i]];
            lines.push(keys[i] + ': ' + entry.quantity + ' @ ' + entry.price.toFixed(2));
        }
        return lines.join('\n');
    }

    function filter(pattern) {
        var re = /^[a-z]+$/i, out = [];
        outer: for (var name in items) {
            switch (typeof pattern) {
                case 'string':
                    if (name.indexOf(pattern) < 0) continue outer;
                    break;
                case 'object':
                    if (!pattern.test(name)) continue outer;
                    break;
                default:
                    if (!re.test(name)) continue;
            }
            out.push(name);
        }
        return out;
    }

    return {
        add: add,
        remove: remove,
        get size() { return count; },
        total: total,
        report: report,
        filter: filter
    };
}());

try {
    Inventory.add('apple', 3, 0.5);
    Inventory.add('pear', 2, 0.75);
    var n = Inventory.size > 1 ? Inventory.total() : -1;
} catch (e) {
    n = 0;
} finally {
    n = n | 0;
}
"#;

fn bench_parse_javascript(c: &mut Criterion) {
    let options = ParserOptions::default();
    c.bench_function("parse_javascript_medium", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let parser = Parser::new(&arena, black_box(JAVASCRIPT_SOURCE), &options);
            let program = parser.parse();
            black_box(program.is_ok());
        });
    });
}

fn bench_parse_with_locations(c: &mut Criterion) {
    let options = ParserOptions {
        locations: true,
        ..ParserOptions::default()
    };
    c.bench_function("parse_javascript_locations", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let parser = Parser::new(&arena, black_box(JAVASCRIPT_SOURCE), &options);
            let program = parser.parse();
            black_box(program.is_ok());
        });
    });
}

criterion_group!(benches, bench_parse_javascript, bench_parse_with_locations);
criterion_main!(benches);
