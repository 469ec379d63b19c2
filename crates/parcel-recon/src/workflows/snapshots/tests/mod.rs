mod comparator;
