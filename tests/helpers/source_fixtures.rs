//! Common source code fixtures for tests.

// Declarations
pub const EMPTY_CLASS: &str = "class C { }";

pub const CLASS_WITH_MEMBERS: &str = r#"
using System;

namespace App {
    class Counter<T> : Base, IDisposable {
        private const int Limit = 10;
        private int count = 0, total;
        public int Count { get; private set; }

        public Counter(int start) : base() {
            count = start;
        }

        public void Add(int amount, ref int result) {
            count += amount;
            result = count;
        }

        public static Counter<T> operator +(Counter<T> a, Counter<T> b) => a;

        ~Counter() { }
    }

    enum Color : byte { Red = 1, Green, Blue }

    delegate void Handler(object sender);
}
"#;

pub const STATEMENTS: &str = r#"
class C {
    async Task<int> M(int[] items, object gate) {
        int sum = 0;
        foreach (var item in items) {
            if (item > 0) {
                sum += item;
            } else {
                continue;
            }
        }
        for (int i = 0; i < items.Length; i++) {
            lock (gate) {
                sum -= i;
            }
        }
        using (var r = Open()) {
            while (r.Next()) {
                checked { sum *= 2; }
            }
        }
        try {
            await Flush();
        } catch (IOException e) when (e.HResult != 0) {
            Log(e);
        } finally {
            Close();
        }
        switch (sum) {
            case 0:
                return 0;
            case int n when n > 100:
                return 100;
            default:
                break;
        }
        int Local(int x) => x * 2;
        Func<int, int> twice = y => Local(y);
        do { sum--; } while (sum > 10);
        return sum;
    }
}
"#;

// Iterators and lambdas
pub const ITERATOR: &str = r#"
class C {
    IEnumerable<int> Numbers(int n) {
        for (int i = 0; i < n; i++) {
            yield return i;
        }
        yield break;
    }
}
"#;

pub const LAMBDAS: &str = r#"
class C {
    void M(int a) {
        int b = a + 1;
        Run(() => b);
        Run(async x => await Wait(x));
        Run((int y, int z) => { return y + z; });
    }
}
"#;
