// Sample documents shared by unit tests
#[cfg(test)]
pub(crate) mod samples {
    /// Block sequence of mappings with flow sequences inside
    pub const SERVERS: &str = "- serverConfig:
    - srv-100:
        settings: [fast, secure]
    - srv-200:
        settings: [reliable, scalable]
        backup_to: storageUnit
- database:
    - srv-300
- webApp
";

    /// Block mapping with a nested block sequence and a document end marker
    pub const POD: &str = "apiVersion: v1
kind: Pod
metadata:
 name: apache-pod
 labels:
   app: web
   steps:
     - uses: actions/checkout@v2
     - name: Set up Python
...";

    /// Comments in awkward places, a quoted value and an empty flow mapping
    pub const COMMENTED: &str = "...
# Document start
kind: Pod # Comment at line end
metadata:
  # A common comment
  build: \"2020-01-01\"
  resources:
    # No resources, but have another comment, it's only wafer-thin
  emptyLabel: {}
";

    /// Mixed block and flow collections, indented inside a leading blank line
    pub const BREAKFAST: &str = "
            - spam:
                - egg: true
                - ham:
                    # Lovely
                    - spam
                - bacon: [egg, spam]
            - sausage:
                - bacon: [egg, spam]
                - beans: {spam: spam}";

    /// Two parents holding a child with the same name
    pub const PARENTS: &str = "
            - parent1:
                - srv-100:
                    fast: true
            - parent2:
                - srv-100:
                    secure: true
            - database:
                - srv-300
            - webApp";
}
